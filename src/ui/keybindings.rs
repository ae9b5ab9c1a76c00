use crate::domain::{Tab, UiMode};
use crate::ui::styles::Theme;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

fn hints_for(tab: Tab, mode: UiMode) -> &'static str {
    match mode {
        UiMode::AddingTask => " Tab next field   ←/→ priority   Enter add   Esc cancel",
        UiMode::TimerSettings => " Tab next field   Enter save   Esc cancel",
        UiMode::ImportPath => " Enter import   Esc cancel",
        UiMode::Normal => match tab {
            Tab::Tasks => {
                " ↑/↓ select   a add   x done   d delete   A archive   Enter focus   s start/pause   \
                 S stop   f count up/down   c timer   t/p/v filter   e export   i import   \
                 D dark   m sound   n notify   Tab view   q quit"
            }
            Tab::Stats => " t tag   p priority   r range   s start/pause   S stop   Tab view   q quit",
            Tab::Archive => " ↑/↓ scroll   s start/pause   S stop   Tab view   q quit",
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, tab: Tab, mode: UiMode, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints_for(tab, mode))).style(theme.hint_style());
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_mode() {
        assert!(hints_for(Tab::Stats, UiMode::Normal).contains("r range"));
        assert!(hints_for(Tab::Tasks, UiMode::ImportPath).contains("Enter import"));
        assert!(!hints_for(Tab::Archive, UiMode::Normal).contains("a add"));
    }
}
