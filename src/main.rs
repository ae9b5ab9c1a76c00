mod alerts;
mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod report;
mod store;
mod timer;
mod ui;

use alerts::{Alerts, InhibitCommand, WakeLock};
use anyhow::{Context, Result};
use app::AppState;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{status_badge, Priority, StatusFilter, TaskDraft, TaskFilter};
use persistence::{
    backup_file, coerce_positive, ensure_data_dir, export_to_path, import_from_path, init_local_data_dir,
    load_settings, save_settings, FileStore, SharedStore, TODOS_KEY,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use report::{default_report_path, render_report, write_report, StatsFilter, TagSelector, TimeRange};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use store::TaskStore;
use timer::{poll_duration, Ticker};

#[derive(Parser)]
#[command(name = "tomatodo")]
#[command(about = "A terminal todo list with a Pomodoro focus timer and statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tomatodo directory in the current directory
    Init,
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Planned number of Pomodoros
        #[arg(short = 'n', long, default_value = "1")]
        pomodoros: String,
        /// Priority: high, medium or low
        #[arg(short, long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// List tasks
    List {
        /// Defaults to active tasks, or everything with --archived
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
        /// Only tasks with this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Only tasks with this priority
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,
        /// Show the archive instead of the active list
        #[arg(long)]
        archived: bool,
    },
    /// Toggle a task's completion
    Toggle { id: u64 },
    /// Delete a task
    Delete { id: u64 },
    /// Move completed tasks to the archive
    Archive,
    /// Export the active list as JSON
    Export {
        /// Output file or directory. Defaults to the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the active list with a JSON export
    Import { path: PathBuf },
    /// Print statistics as a markdown report
    Stats {
        /// Only tasks with this tag
        #[arg(short, long, conflicts_with = "untagged")]
        tag: Option<String>,
        /// Only tasks without tags
        #[arg(long)]
        untagged: bool,
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,
        /// Trend range: week, month or year
        #[arg(short, long, default_value = "week", value_parser = parse_range)]
        range: TimeRange,
        /// Write the report to this file instead of stdout
        #[arg(short, long, conflicts_with = "save")]
        output: Option<PathBuf>,
        /// Write the report to <data dir>/report-YYYY-MM-DD.md
        #[arg(long)]
        save: bool,
    },
    /// Show or change preferences
    Settings {
        #[arg(long)]
        dark: Option<bool>,
        /// Primary colour as #rrggbb
        #[arg(long)]
        primary: Option<String>,
        /// Secondary colour as #rrggbb
        #[arg(long)]
        secondary: Option<String>,
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        notifications: Option<bool>,
        /// Work session length in minutes
        #[arg(long)]
        work: Option<String>,
        /// Break length in minutes
        #[arg(long = "break")]
        rest: Option<String>,
        /// Audio file played when a work session ends
        #[arg(long)]
        work_sound: Option<PathBuf>,
        /// Audio file played when a break ends
        #[arg(long)]
        break_sound: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Completed,
    All,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => StatusFilter::Active,
            StatusArg::Completed => StatusFilter::Completed,
            StatusArg::All => StatusFilter::All,
        }
    }
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_tag(value).ok_or_else(|| format!("unknown priority '{}' (high, medium, low)", value))
}

fn parse_range(value: &str) -> Result<TimeRange, String> {
    TimeRange::parse(value).ok_or_else(|| format!("unknown range '{}' (week, month, year)", value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized tomatodo directory: {}", data_dir.display());
        println!();
        println!("tomatodo will now use this local directory for its data.");
        println!("Run 'tomatodo' to start.");
        return Ok(());
    }

    let data_dir = ensure_data_dir()?;
    let _log_guard = logging::init(&data_dir)?;
    let files = Arc::new(FileStore::new(&data_dir));
    let storage: SharedStore = files.clone();
    tracing::info!(dir = %data_dir.display(), "using data directory");

    match cli.command {
        None => run_tui(storage),
        Some(Commands::Init) => Ok(()),
        Some(Commands::Add {
            text,
            pomodoros,
            priority,
            tags,
        }) => {
            let mut store = TaskStore::load(storage)?;
            let draft = TaskDraft::new(&text, priority, TaskDraft::parse_tags(&tags), coerce_positive(&pomodoros))?;
            let id = store.add(draft, Utc::now())?;
            println!("Added task {}", id);
            Ok(())
        }
        Some(Commands::List {
            status,
            tag,
            priority,
            archived,
        }) => {
            let store = TaskStore::load(storage)?;
            let status = match (status, archived) {
                (Some(arg), _) => arg.into(),
                (None, true) => StatusFilter::All,
                (None, false) => StatusFilter::Active,
            };
            let filter = TaskFilter { tag, priority, status };
            let rows = if archived {
                domain::visible_tasks(store.archived(), &filter)
            } else {
                store.visible(&filter)
            };
            if rows.is_empty() {
                println!("No tasks.");
            }
            for task in rows {
                let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
                println!(
                    "{:>14} {} {} [{}] {} {}",
                    task.id,
                    status_badge(task),
                    task.text,
                    task.priority.to_tag(),
                    task.progress_label(),
                    tags.join(" ")
                );
            }
            Ok(())
        }
        Some(Commands::Toggle { id }) => {
            let mut store = TaskStore::load(storage)?;
            if !store.toggle(id, Utc::now())? {
                anyhow::bail!("No active task with id {}", id);
            }
            let done = store.get(id).is_some_and(|t| t.completed);
            println!("Task {} is now {}", id, if done { "completed" } else { "open" });
            Ok(())
        }
        Some(Commands::Delete { id }) => {
            let mut store = TaskStore::load(storage)?;
            if !store.delete(id)? {
                anyhow::bail!("No active task with id {}", id);
            }
            println!("Deleted task {}", id);
            Ok(())
        }
        Some(Commands::Archive) => {
            let mut store = TaskStore::load(storage)?;
            let moved = store.archive()?;
            println!("Archived {} task(s)", moved);
            Ok(())
        }
        Some(Commands::Export { output }) => {
            let store = TaskStore::load(storage)?;
            let target = match output {
                Some(path) => path,
                None => std::env::current_dir().context("Could not determine current directory")?,
            };
            let path = export_to_path(store.active(), &target, Utc::now())?;
            println!("Exported {} task(s) to {}", store.active().len(), path.display());
            Ok(())
        }
        Some(Commands::Import { path }) => {
            let mut store = TaskStore::load(storage)?;
            // Parse first so a bad file leaves everything untouched
            let tasks = import_from_path(&path)?;
            if let Some(backup) = backup_file(files.path_for(TODOS_KEY))? {
                println!("Backed up current tasks to {}", backup.display());
            }
            let count = tasks.len();
            store.replace_active(tasks)?;
            tracing::info!(count, path = %path.display(), "imported tasks");
            println!("Imported {} task(s)", count);
            Ok(())
        }
        Some(Commands::Stats {
            tag,
            untagged,
            priority,
            range,
            output,
            save,
        }) => {
            let store = TaskStore::load(storage)?;
            let selector = match (tag, untagged) {
                (Some(tag), _) => TagSelector::Tag(tag),
                (None, true) => TagSelector::Untagged,
                (None, false) => TagSelector::All,
            };
            let filter = StatsFilter {
                tag: selector,
                priority,
            };
            let now = Local::now();
            let report = render_report(store.active(), store.archived(), &filter, range, now);

            let target = if save {
                Some(default_report_path(&data_dir, now))
            } else {
                output
            };
            match target {
                Some(path) => {
                    write_report(&report, &path)?;
                    println!("Report written: {}", path.display());
                }
                None => print!("{}", report),
            }
            Ok(())
        }
        Some(Commands::Settings {
            dark,
            primary,
            secondary,
            sound,
            notifications,
            work,
            rest,
            work_sound,
            break_sound,
        }) => {
            let mut settings = load_settings(storage.as_ref())?;
            let before = settings.clone();

            if let Some(value) = dark {
                settings.dark_mode = value;
            }
            if let Some(value) = primary {
                settings.set_primary_color(&value)?;
            }
            if let Some(value) = secondary {
                settings.set_secondary_color(&value)?;
            }
            if let Some(value) = sound {
                settings.sound_enabled = value;
            }
            if let Some(value) = notifications {
                settings.notifications_enabled = value;
            }
            if work.is_some() || rest.is_some() {
                let work_minutes = work.as_deref().map_or(settings.work_minutes, coerce_positive);
                let break_minutes = rest.as_deref().map_or(settings.break_minutes, coerce_positive);
                settings.set_durations(work_minutes, break_minutes);
            }
            if let Some(path) = work_sound {
                settings.work_sound = Some(path);
            }
            if let Some(path) = break_sound {
                settings.break_sound = Some(path);
            }

            if settings != before {
                save_settings(storage.as_ref(), &settings)?;
                println!("Settings saved.");
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn run_tui(storage: SharedStore) -> Result<()> {
    // Nothing is fatal except failing to read existing data
    let store = TaskStore::load(storage.clone())?;
    let settings = load_settings(storage.as_ref())?;

    let alerts = Alerts::new(&settings, WakeLock::new(InhibitCommand::platform()));
    let export_dir = default_export_dir()?;
    let mut app = AppState::new(store, settings, storage, alerts, Ticker::default(), export_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();

    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting after error");
        eprintln!("Error: {}", err);
    }

    result
}

/// Exports land in the downloads folder when there is one
fn default_export_dir() -> Result<PathBuf> {
    match dirs::download_dir().filter(|d| d.is_dir()) {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Could not determine current directory"),
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let poll_rate = poll_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(poll_rate)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => match input::handle_key(app, key) {
                    Ok(true) => return Ok(()),
                    Ok(false) => {}
                    Err(e) => report_error(app, &e),
                },
                Event::FocusGained => app.set_focus(true),
                Event::FocusLost => app.set_focus(false),
                _ => {}
            }
        }

        if let Err(e) = app.update(Instant::now()) {
            report_error(app, &e);
        }
    }
}

/// Failed saves are shown in the status line; the session keeps going
fn report_error(app: &mut AppState, error: &anyhow::Error) {
    tracing::error!(error = %error, "action failed");
    app.set_status(format!("Error: {:#}", error));
}
