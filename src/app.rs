use crate::alerts::Alerts;
use crate::domain::{cycle_option, Priority, Tab, Task, TaskDraft, TaskFilter, TaskId, TimerMode, UiMode};
use crate::persistence::{coerce_positive, export_to_path, import_from_path, save_settings, Settings, SharedStore};
use crate::report::{calculate_statistics, Statistics, StatsFilter, TimeRange};
use crate::store::TaskStore;
use crate::timer::{Ticker, TimerEngine, TimerEvent};
use anyhow::Result;
use chrono::{Local, Utc};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

/// How long the celebration stays up, in UI frames (4 per second)
pub const CELEBRATION_FRAMES: u32 = 16;

/// Add form: 0 = text, 1 = pomodoros, 2 = priority, 3 = tags
pub const ADD_FORM_FIELDS: usize = 4;

/// Input form state for adding tasks
#[derive(Debug, Clone, Default)]
pub struct AddFormState {
    pub text: String,
    pub pomodoros: String,
    pub priority: Priority,
    pub tags: String, // Comma-separated tags
    pub editing_field: usize,
}

/// Timer settings form: 0 = work minutes, 1 = break minutes
#[derive(Debug, Clone)]
pub struct TimerFormState {
    pub work: String,
    pub rest: String,
    pub editing_field: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Celebration {
    pub started_frame: u32,
    /// Text of the finished task
    pub task: Option<String>,
}

/// Main application state. The only writer of the task store.
pub struct AppState {
    pub store: TaskStore,
    pub engine: TimerEngine,
    pub settings: Settings,
    pub alerts: Alerts,
    storage: SharedStore,
    ticker: Ticker,
    export_dir: PathBuf,

    pub tab: Tab,
    pub ui_mode: UiMode,
    pub filter: TaskFilter,
    pub selected_index: usize,
    pub archive_scroll: usize,
    pub stats_filter: StatsFilter,
    pub time_range: TimeRange,

    pub add_form: Option<AddFormState>,
    pub timer_form: Option<TimerFormState>,
    pub import_input: Option<String>,
    pub status_message: Option<String>,
    pub celebration: Option<Celebration>,

    // Increments every loop iteration, drives animations
    pub animation_frame: u32,
}

impl AppState {
    pub fn new(
        store: TaskStore,
        settings: Settings,
        storage: SharedStore,
        alerts: Alerts,
        ticker: Ticker,
        export_dir: PathBuf,
    ) -> Self {
        let engine = TimerEngine::new(settings.work_minutes, settings.break_minutes);
        Self {
            store,
            engine,
            settings,
            alerts,
            storage,
            ticker,
            export_dir,
            tab: Tab::Tasks,
            ui_mode: UiMode::Normal,
            filter: TaskFilter::default(),
            selected_index: 0,
            archive_scroll: 0,
            stats_filter: StatsFilter::default(),
            time_range: TimeRange::default(),
            add_form: None,
            timer_form: None,
            import_input: None,
            status_message: None,
            celebration: None,
            animation_frame: 0,
        }
    }

    pub fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status_message = Some(message.into());
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // ----- Task list -----

    /// Rows of the task list, filtered and sorted
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.store.visible(&self.filter)
    }

    /// Task under the cursor
    pub fn highlighted(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected_index).copied()
    }

    fn highlighted_id(&self) -> Option<TaskId> {
        self.highlighted().map(|t| t.id)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        let count = self.visible_tasks().len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_tasks().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    pub fn cycle_tag_filter(&mut self) {
        let tags = self.store.all_tags();
        self.filter.tag = cycle_option(&self.filter.tag, &tags);
        self.clamp_selection();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filter.priority = cycle_option(&self.filter.priority, Priority::all());
        self.clamp_selection();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = self.filter.status.next();
        self.clamp_selection();
    }

    pub fn toggle_highlighted(&mut self) -> Result<()> {
        if let Some(id) = self.highlighted_id() {
            self.store.toggle(id, Utc::now())?;
            self.sync_timer();
            self.clamp_selection();
        }
        Ok(())
    }

    pub fn delete_highlighted(&mut self) -> Result<()> {
        if let Some(id) = self.highlighted_id() {
            self.store.delete(id)?;
            self.sync_timer();
            self.clamp_selection();
        }
        Ok(())
    }

    /// Move all completed tasks to the archive
    pub fn archive_completed(&mut self) -> Result<()> {
        let moved = self.store.archive()?;
        self.sync_timer();
        self.clamp_selection();
        if moved == 0 {
            self.set_status("No completed tasks to archive");
        } else {
            self.set_status(format!("Archived {} task(s)", moved));
        }
        Ok(())
    }

    // ----- Add form -----

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        self.add_form = Some(AddFormState::default());
        self.ui_mode = UiMode::AddingTask;
    }

    /// Cycle through the form fields
    pub fn add_form_next_field(&mut self) {
        if let Some(form) = &mut self.add_form {
            form.editing_field = (form.editing_field + 1) % ADD_FORM_FIELDS;
        }
    }

    /// Add character to the current field. The priority field cycles instead.
    pub fn add_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.add_form {
            match form.editing_field {
                0 => form.text.push(c),
                1 if c.is_ascii_digit() => form.pomodoros.push(c),
                2 if c == ' ' => form.priority = form.priority.next(),
                3 => form.tags.push(c),
                _ => {}
            }
        }
    }

    pub fn add_form_cycle_priority(&mut self) {
        if let Some(form) = &mut self.add_form {
            form.priority = form.priority.next();
        }
    }

    pub fn add_form_backspace(&mut self) {
        if let Some(form) = &mut self.add_form {
            match form.editing_field {
                0 => {
                    form.text.pop();
                }
                1 => {
                    form.pomodoros.pop();
                }
                3 => {
                    form.tags.pop();
                }
                _ => {}
            }
        }
    }

    /// Submit the form. Blank text keeps the form open with a message.
    pub fn submit_add_form(&mut self) -> Result<()> {
        let Some(form) = self.add_form.take() else {
            return Ok(());
        };

        let draft = TaskDraft::new(
            &form.text,
            form.priority,
            TaskDraft::parse_tags(&form.tags),
            coerce_positive(&form.pomodoros),
        );

        match draft {
            Ok(draft) => {
                self.ui_mode = UiMode::Normal;
                self.store.add(draft, Utc::now())?;
                self.status_message = None;
            }
            Err(e) => {
                self.set_status(e.to_string());
                self.add_form = Some(form);
            }
        }
        Ok(())
    }

    pub fn cancel_add_form(&mut self) {
        self.add_form = None;
        self.ui_mode = UiMode::Normal;
    }

    // ----- Timer -----

    /// Point the timer at the highlighted task, or release it if already selected
    pub fn select_highlighted_for_timer(&mut self) {
        let Some(task) = self.highlighted().cloned() else {
            return;
        };

        if self.engine.selected_id() == Some(task.id) {
            self.engine.deselect();
            self.set_status("Timer no longer tracks a task");
        } else if task.completed {
            self.set_status("Task is already completed");
        } else {
            self.set_status(format!("Timer tracks: {}", task.text));
            self.engine.select(task);
        }
    }

    /// Start, or pause when running
    pub fn toggle_timer(&mut self) -> Result<()> {
        if self.engine.is_running() {
            self.engine.pause();
            self.sync_timer();
            Ok(())
        } else {
            let events = self.engine.start();
            self.handle_timer_events(events)
        }
    }

    pub fn stop_timer(&mut self) -> Result<()> {
        let events = self.engine.stop();
        self.handle_timer_events(events)
    }

    pub fn toggle_timer_direction(&mut self) {
        match self.engine.toggle_direction() {
            Ok(direction) => self.set_status(format!("Timer mode: {}", direction.name())),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Open the durations form. Not available while the timer runs.
    pub fn open_timer_settings(&mut self) {
        if self.engine.is_running() {
            self.set_status(crate::timer::TimerError::Running.to_string());
            return;
        }
        self.timer_form = Some(TimerFormState {
            work: self.engine.work_minutes().to_string(),
            rest: self.engine.break_minutes().to_string(),
            editing_field: 0,
        });
        self.ui_mode = UiMode::TimerSettings;
    }

    pub fn timer_form_next_field(&mut self) {
        if let Some(form) = &mut self.timer_form {
            form.editing_field = (form.editing_field + 1) % 2;
        }
    }

    pub fn timer_form_add_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        if let Some(form) = &mut self.timer_form {
            match form.editing_field {
                0 => form.work.push(c),
                _ => form.rest.push(c),
            }
        }
    }

    pub fn timer_form_backspace(&mut self) {
        if let Some(form) = &mut self.timer_form {
            match form.editing_field {
                0 => form.work.pop(),
                _ => form.rest.pop(),
            };
        }
    }

    /// Apply durations; empty or zero fields become one minute
    pub fn submit_timer_form(&mut self) -> Result<()> {
        let Some(form) = self.timer_form.take() else {
            return Ok(());
        };
        self.ui_mode = UiMode::Normal;

        let work = coerce_positive(&form.work);
        let rest = coerce_positive(&form.rest);
        if let Err(e) = self.engine.configure(work, rest) {
            self.set_status(e.to_string());
            return Ok(());
        }

        self.settings.set_durations(work, rest);
        save_settings(self.storage.as_ref(), &self.settings)?;
        self.set_status(format!("Work {} min, break {} min", work, rest));
        Ok(())
    }

    pub fn cancel_timer_form(&mut self) {
        self.timer_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Advance the clock by delivered ticks, then start any due phase
    pub fn update(&mut self, now: Instant) -> Result<()> {
        let ticks = self.ticker.drain();
        self.on_ticks(ticks)?;
        let events = self.engine.fire_due(now);
        if !events.is_empty() {
            self.handle_timer_events(events)?;
        }

        self.animation_frame = self.animation_frame.wrapping_add(1);
        let frame = self.animation_frame;
        let expired = self
            .celebration
            .as_ref()
            .is_some_and(|c| frame.wrapping_sub(c.started_frame) >= CELEBRATION_FRAMES);
        if expired {
            self.celebration = None;
        }
        Ok(())
    }

    /// Feed whole seconds to the engine
    pub fn on_ticks(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            let was_running = self.engine.is_running();
            let events = self.engine.tick();
            if !events.is_empty() {
                self.handle_timer_events(events)?;
            } else if was_running && !self.engine.is_running() {
                // A countdown with no task stops silently
                self.sync_timer();
            }
        }
        Ok(())
    }

    /// Apply engine events. Every event is handled even if saving fails;
    /// the first error is returned.
    fn handle_timer_events(&mut self, events: Vec<TimerEvent>) -> Result<()> {
        let mut result = Ok(());
        for event in events {
            match event {
                TimerEvent::TaskUpdated(task) => {
                    if let Err(e) = self.store.apply(task) {
                        tracing::error!(error = %e, "failed to save timer progress");
                        if result.is_ok() {
                            result = Err(e);
                        }
                    }
                }
                TimerEvent::PhaseFinished(mode) => {
                    self.alerts.phase_finished(mode);
                    self.set_status(format!("{} session finished", mode.name()));
                }
                TimerEvent::Chime(mode) => self.alerts.chime(mode),
                TimerEvent::Celebrate => {
                    self.celebration = Some(Celebration {
                        started_frame: self.animation_frame,
                        task: self.engine.selected().map(|t| t.text.clone()),
                    });
                }
                TimerEvent::PhaseScheduled(mode) => {
                    self.set_status(format!("{} starts in a moment", mode.name()));
                }
                TimerEvent::PhaseStarted(mode) => {
                    self.set_status(format!("{} started", mode.name()));
                }
            }
        }
        self.sync_timer();
        result
    }

    /// Refresh the timer's task snapshot and match the ticker and wake
    /// lock to the running state
    fn sync_timer(&mut self) {
        if let Some(id) = self.engine.selected_id() {
            // A completed task is kept through its break so the break end
            // can still celebrate it
            let busy = self.engine.is_running()
                || self.engine.pending_mode().is_some()
                || self.engine.mode() == TimerMode::Break;
            let current = self.store.get(id).filter(|t| busy || !t.completed);
            self.engine.sync_selected(current);
        }

        let running = self.engine.is_running();
        self.ticker.reconcile(running);
        self.alerts.wake_lock.update(running);
    }

    /// Terminal focus changed
    pub fn set_focus(&mut self, focused: bool) {
        self.alerts.wake_lock.set_focus(focused, self.engine.is_running());
    }

    pub fn dismiss_celebration(&mut self) -> bool {
        self.celebration.take().is_some()
    }

    // ----- Statistics -----

    pub fn statistics(&self) -> Statistics {
        calculate_statistics(
            self.store.active(),
            self.store.archived(),
            &self.stats_filter,
            self.time_range,
            Local::now(),
        )
    }

    /// Tags across active and archived tasks, sorted
    fn stats_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&String> = self
            .store
            .active()
            .iter()
            .chain(self.store.archived())
            .flat_map(|t| t.tags.iter())
            .collect();
        tags.into_iter().cloned().collect()
    }

    pub fn cycle_stats_tag(&mut self) {
        let tags = self.stats_tags();
        self.stats_filter.tag = self.stats_filter.tag.next(&tags);
    }

    pub fn cycle_stats_priority(&mut self) {
        self.stats_filter.priority = cycle_option(&self.stats_filter.priority, Priority::all());
    }

    pub fn cycle_time_range(&mut self) {
        self.time_range = self.time_range.next();
    }

    // ----- Archive view -----

    pub fn scroll_archive_up(&mut self) {
        self.archive_scroll = self.archive_scroll.saturating_sub(1);
    }

    pub fn scroll_archive_down(&mut self) {
        if self.archive_scroll + 1 < self.store.archived().len() {
            self.archive_scroll += 1;
        }
    }

    // ----- Export / import -----

    pub fn export_tasks(&mut self) {
        match export_to_path(self.store.active(), &self.export_dir, Utc::now()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "exported tasks");
                self.set_status(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.set_status(format!("Export failed: {}", e));
            }
        }
    }

    pub fn start_import(&mut self) {
        self.import_input = Some(String::new());
        self.ui_mode = UiMode::ImportPath;
    }

    pub fn import_add_char(&mut self, c: char) {
        if let Some(input) = &mut self.import_input {
            input.push(c);
        }
    }

    pub fn import_backspace(&mut self) {
        if let Some(input) = &mut self.import_input {
            input.pop();
        }
    }

    pub fn cancel_import(&mut self) {
        self.import_input = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Replace the active list with the file's tasks. A bad file leaves
    /// everything unchanged.
    pub fn submit_import(&mut self) -> Result<()> {
        let Some(input) = self.import_input.take() else {
            return Ok(());
        };
        self.ui_mode = UiMode::Normal;

        let path = expand_home(input.trim());
        match import_from_path(&path) {
            Ok(tasks) => {
                let count = tasks.len();
                self.store.replace_active(tasks)?;
                self.sync_timer();
                self.selected_index = 0;
                tracing::info!(count, path = %path.display(), "imported tasks");
                self.set_status(format!("Imported {} task(s)", count));
            }
            Err(e) => {
                tracing::warn!(error = %e, "import rejected");
                self.set_status(e.to_string());
            }
        }
        Ok(())
    }

    // ----- Preferences -----

    fn save_preferences(&mut self) -> Result<()> {
        self.alerts.apply_settings(&self.settings);
        save_settings(self.storage.as_ref(), &self.settings)
    }

    pub fn toggle_dark_mode(&mut self) -> Result<()> {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.save_preferences()
    }

    pub fn toggle_sound(&mut self) -> Result<()> {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        let state = if self.settings.sound_enabled { "on" } else { "off" };
        self.set_status(format!("Sound {}", state));
        self.save_preferences()
    }

    pub fn toggle_notifications(&mut self) -> Result<()> {
        self.settings.notifications_enabled = !self.settings.notifications_enabled;
        self.save_preferences()?;
        let message = if !self.settings.notifications_enabled {
            "Notifications off"
        } else if self.alerts.notifications_enabled() {
            "Notifications on"
        } else {
            "Notifications on, but no notifier is installed"
        };
        self.set_status(message);
        Ok(())
    }

    /// Stop background work before exit
    pub fn shutdown(&mut self) {
        self.engine.pause();
        self.ticker.stop();
        self.alerts.wake_lock.release();
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}
