use crate::app::AppState;
use crate::domain::{Tab, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    // Any key dismisses the celebration
    if app.dismiss_celebration() {
        return Ok(false);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_add_form_mode(app, key),
        UiMode::TimerSettings => handle_timer_form_mode(app, key),
        UiMode::ImportPath => handle_import_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),

        // Tabs
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Tasks),
        KeyCode::Char('2') => app.set_tab(Tab::Stats),
        KeyCode::Char('3') => app.set_tab(Tab::Archive),

        // Timer controls work from every tab
        KeyCode::Char('s') => app.toggle_timer()?,
        KeyCode::Char('S') => app.stop_timer()?,
        KeyCode::Char('f') => app.toggle_timer_direction(),
        KeyCode::Char('c') => app.open_timer_settings(),

        // Preferences
        KeyCode::Char('D') => app.toggle_dark_mode()?,
        KeyCode::Char('m') => app.toggle_sound()?,
        KeyCode::Char('n') => app.toggle_notifications()?,

        // Transfer
        KeyCode::Char('e') => app.export_tasks(),
        KeyCode::Char('i') => app.start_import(),

        _ => match app.tab {
            Tab::Tasks => handle_tasks_tab(app, key)?,
            Tab::Stats => handle_stats_tab(app, key),
            Tab::Archive => handle_archive_tab(app, key),
        },
    }
    Ok(false)
}

fn handle_tasks_tab(app: &mut AppState, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_highlighted()?,
        KeyCode::Char('d') | KeyCode::Delete => app.delete_highlighted()?,
        KeyCode::Char('A') => app.archive_completed()?,
        KeyCode::Enter => app.select_highlighted_for_timer(),

        // Filters
        KeyCode::Char('t') => app.cycle_tag_filter(),
        KeyCode::Char('p') => app.cycle_priority_filter(),
        KeyCode::Char('v') => app.cycle_status_filter(),
        _ => {}
    }
    Ok(())
}

fn handle_stats_tab(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') => app.cycle_stats_tag(),
        KeyCode::Char('p') => app.cycle_stats_priority(),
        KeyCode::Char('r') => app.cycle_time_range(),
        _ => {}
    }
}

fn handle_archive_tab(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_archive_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_archive_down(),
        _ => {}
    }
}

/// Handle keys in the add-task form
fn handle_add_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.cancel_add_form(),
        KeyCode::Enter => app.submit_add_form()?,
        KeyCode::Tab => app.add_form_next_field(),
        KeyCode::Left | KeyCode::Right => app.add_form_cycle_priority(),
        KeyCode::Backspace => app.add_form_backspace(),
        KeyCode::Char(c) => app.add_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the timer settings form
fn handle_timer_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.cancel_timer_form(),
        KeyCode::Enter => app.submit_timer_form()?,
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => app.timer_form_next_field(),
        KeyCode::Backspace => app.timer_form_backspace(),
        KeyCode::Char(c) => app.timer_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the import path prompt
fn handle_import_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.cancel_import(),
        KeyCode::Enter => app.submit_import()?,
        KeyCode::Backspace => app.import_backspace(),
        KeyCode::Char(c) => app.import_add_char(c),
        _ => {}
    }
    Ok(false)
}
