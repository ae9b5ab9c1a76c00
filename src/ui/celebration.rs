use crate::app::{AppState, CELEBRATION_FRAMES};
use crate::ui::{layout::create_modal_area, styles::Theme};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const CONFETTI: [&str; 4] = [
    " *  .  +  .  *  .  + ",
    " .  +  *  .  +  *  . ",
    " +  *  .  +  *  .  * ",
    " .  .  +  *  .  +  . ",
];

/// Lines of the celebration banner for one animation frame
fn celebration_lines(frame: u32, task: Option<&str>) -> Vec<Line<'static>> {
    let confetti = CONFETTI[frame as usize % CONFETTI.len()];
    let trailing = CONFETTI[(frame as usize + 2) % CONFETTI.len()];
    let tomato = if frame % 2 == 0 { "🍅 🎉 🍅" } else { "🎉 🍅 🎉" };

    let mut lines = vec![
        Line::raw(confetti),
        Line::raw(""),
        Line::raw(tomato),
        Line::styled("Session complete!", Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(text) = task {
        lines.push(Line::raw(text.to_string()));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(trailing));
    lines
}

/// Render the celebration overlay while it is active
pub fn render_celebration(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let Some(celebration) = &app.celebration else {
        return;
    };

    let frame = app.animation_frame.saturating_sub(celebration.started_frame);
    if frame >= CELEBRATION_FRAMES {
        return;
    }

    let lines = celebration_lines(frame, celebration.task.as_deref());
    let modal_area = create_modal_area(area, lines.len() as u16 + 2);

    f.render_widget(Clear, modal_area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Well done ", theme.modal_title_style()))
                .style(theme.modal_bg_style()),
        );
    f.render_widget(paragraph, modal_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celebration_frames_animate() {
        let first = celebration_lines(0, Some("Write"));
        let second = celebration_lines(1, Some("Write"));
        assert_ne!(first[0], second[0]);
        assert!(first.iter().any(|l| l.spans.iter().any(|s| s.content == "Write")));
        assert_eq!(celebration_lines(0, None).len(), first.len() - 1);
    }
}
