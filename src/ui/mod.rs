pub mod archive_pane;
pub mod celebration;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod stats_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::{format_clock, Tab, UiMode};
use archive_pane::render_archive_pane;
use celebration::render_celebration;
use input_form::{render_add_form, render_import_prompt, render_timer_form};
use keybindings::render_keybindings;
use layout::{create_layout, split_tasks_view};
use list_pane::render_list_pane;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Paragraph, Tabs},
    Frame,
};
use stats_pane::render_stats_pane;
use styles::Theme;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let theme = Theme::from_settings(&app.settings);
    let layout = create_layout(size);

    f.render_widget(Block::default().style(theme.default_style()), size);

    render_tabs(f, app, &theme, layout.tabs_area);
    render_keybindings(f, app.tab, app.ui_mode, &theme, layout.keybindings_area);

    match app.tab {
        Tab::Tasks => {
            let (list_area, timer_area) = split_tasks_view(layout.content_area);
            render_list_pane(f, app, &theme, list_area);
            render_timer_pane(f, app, &theme, timer_area);
        }
        Tab::Stats => render_stats_pane(f, app, &theme, layout.content_area),
        Tab::Archive => render_archive_pane(f, app, &theme, layout.content_area),
    }

    render_status_line(f, app, &theme, layout.status_area);

    match app.ui_mode {
        UiMode::AddingTask => render_add_form(f, app, &theme, size),
        UiMode::TimerSettings => render_timer_form(f, app, &theme, size),
        UiMode::ImportPath => render_import_prompt(f, app, &theme, size),
        UiMode::Normal => {}
    }

    // Celebration goes on top of everything
    render_celebration(f, app, &theme, size);
}

fn render_tabs(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::raw(format!("{} {}", i + 1, tab.title())))
        .collect();

    // The clock stays visible from every tab
    let clock = format!(
        " 🍅 {} {} ",
        app.engine.mode().name(),
        format_clock(app.engine.display_seconds())
    );

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(Span::styled(" tomatodo ", theme.title_style()))
                .title(
                    Title::from(Span::styled(clock, theme.mode_style(app.engine.mode())))
                        .alignment(Alignment::Right),
                ),
        )
        .select(app.tab.index())
        .style(theme.default_style())
        .highlight_style(theme.selected_style());
    f.render_widget(tabs, area);
}

fn render_status_line(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let sound = if app.settings.sound_enabled { "on" } else { "off" };
    let notify = if app.settings.notifications_enabled { "on" } else { "off" };
    let awake = if app.alerts.wake_lock.is_held() { "· screen awake " } else { "" };
    let mut spans = vec![Span::styled(
        format!(" sound {} · notify {} {}", sound, notify, awake),
        theme.hint_style(),
    )];
    if let Some(message) = &app.status_message {
        spans.push(Span::styled(format!("· {}", message), theme.title_style()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Alerts;
    use crate::domain::{Priority, TaskDraft};
    use crate::persistence::{MemoryStore, Settings, SharedStore};
    use crate::store::TaskStore;
    use crate::timer::Ticker;
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn create_test_app() -> AppState {
        let storage: SharedStore = Arc::new(MemoryStore::new());
        let mut store = TaskStore::load(storage.clone()).unwrap();
        let draft = TaskDraft::new("Write report", Priority::High, ["work"], 2).unwrap();
        store.add(draft, Utc::now()).unwrap();
        AppState::new(
            store,
            Settings::default(),
            storage,
            Alerts::disabled(),
            Ticker::default(),
            std::env::temp_dir(),
        )
    }

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_every_tab() {
        let mut app = create_test_app();

        let screen = draw(&app);
        assert!(screen.contains("Write report"));
        assert!(screen.contains("25:00"));

        app.set_tab(Tab::Stats);
        let screen = draw(&app);
        assert!(screen.contains("Completion"));

        app.set_tab(Tab::Archive);
        let screen = draw(&app);
        assert!(screen.contains("Archive (0)"));
    }

    #[test]
    fn test_render_forms() {
        let mut app = create_test_app();
        app.start_add_task();
        assert!(draw(&app).contains("Add Task"));
        app.cancel_add_form();

        app.open_timer_settings();
        assert!(draw(&app).contains("Timer Settings"));
        app.cancel_timer_form();

        app.start_import();
        assert!(draw(&app).contains("Import Tasks"));
    }
}
