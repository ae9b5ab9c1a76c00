use crate::app::AppState;
use crate::domain::{format_clock, format_minutes, TimerDirection, TimerMode};
use crate::timer::TimerEngine;
use crate::ui::styles::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Fraction of the current phase that has elapsed
fn phase_ratio(engine: &TimerEngine) -> f64 {
    let total = engine.phase_secs(engine.mode());
    if total == 0 {
        return 0.0;
    }
    let done = match engine.direction() {
        TimerDirection::Countdown => total.saturating_sub(engine.remaining_secs()),
        TimerDirection::Stopwatch => engine.elapsed_secs(),
    };
    (done as f64 / total as f64).clamp(0.0, 1.0)
}

fn state_label(engine: &TimerEngine) -> String {
    if let Some(next) = engine.pending_mode() {
        format!("{} starting...", next.name())
    } else if engine.is_running() {
        "running".to_string()
    } else {
        "paused".to_string()
    }
}

/// Render the timer pane
pub fn render_timer_pane(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let engine = &app.engine;
    let mode = engine.mode();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(format!(" 🍅 {} ", mode.name()), theme.mode_style(mode)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Clock
            Constraint::Length(1), // Gauge
            Constraint::Min(0),    // Details
        ])
        .split(inner);

    let clock = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(format_clock(engine.display_seconds()), theme.mode_style(mode)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(clock, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(theme.gauge_style(mode))
        .ratio(phase_ratio(engine))
        .label(state_label(engine));
    f.render_widget(gauge, chunks[1]);

    let mut lines = vec![Line::raw("")];
    let direction = match engine.direction() {
        TimerDirection::Countdown => "counting down",
        TimerDirection::Stopwatch => "counting up",
    };
    lines.push(Line::from(vec![
        Span::styled("Clock:  ", theme.title_style()),
        Span::raw(direction),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Phases: ", theme.title_style()),
        Span::raw(format!(
            "{} work / {} break",
            format_minutes(u64::from(engine.work_minutes())),
            format_minutes(u64::from(engine.break_minutes()))
        )),
    ]));
    lines.push(Line::raw(""));

    match engine.selected() {
        Some(task) => {
            lines.push(Line::from(vec![
                Span::styled("Task:   ", theme.title_style()),
                Span::raw(task.text.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Done:   ", theme.title_style()),
                Span::raw(format!("🍅 {}", task.progress_label())),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Focus:  ", theme.title_style()),
                Span::raw(format_minutes(u64::from(task.total_work_time))),
            ]));
        }
        None => {
            let hint = if mode == TimerMode::Work {
                "No task selected. Press Enter on a task to focus on it."
            } else {
                "No task selected."
            };
            lines.push(Line::styled(hint, theme.hint_style()));
        }
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(details, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_phase_ratio_and_label() {
        let mut engine = TimerEngine::new(1, 1);
        assert_eq!(phase_ratio(&engine), 0.0);
        assert_eq!(state_label(&engine), "paused");

        engine.start();
        for _ in 0..30 {
            engine.tick();
        }
        assert_eq!(phase_ratio(&engine), 0.5);
        assert_eq!(state_label(&engine), "running");

        engine.pause();
        engine.toggle_direction().unwrap();
        engine.start();
        for _ in 0..15 {
            engine.tick();
        }
        assert_eq!(phase_ratio(&engine), 0.25);
    }
}
