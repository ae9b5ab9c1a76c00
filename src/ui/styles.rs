use crate::domain::{Priority, TimerMode};
use crate::persistence::Settings;
use ratatui::style::{Color, Modifier, Style};

/// Colors derived from the user's settings. Rebuilt every frame so a
/// settings change shows up immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub foreground: Color,
    pub background: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_settings(settings: &Settings) -> Self {
        let (pr, pg, pb) = settings.primary_rgb();
        let (sr, sg, sb) = settings.secondary_rgb();
        let (foreground, background, muted) = if settings.dark_mode {
            (Color::White, Color::Black, Color::DarkGray)
        } else {
            (Color::Black, Color::White, Color::Gray)
        };
        Self {
            primary: Color::Rgb(pr, pg, pb),
            secondary: Color::Rgb(sr, sg, sb),
            foreground,
            background,
            muted,
        }
    }

    /// Default text style
    pub fn default_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    /// Selected row highlight style
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style for panes
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Keybinding hint style
    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn modal_bg_style(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn modal_title_style(&self) -> Style {
        Style::default().fg(self.secondary).add_modifier(Modifier::BOLD)
    }

    /// Clock and gauge color for the current phase
    pub fn mode_style(&self, mode: TimerMode) -> Style {
        let color = match mode {
            TimerMode::Work => self.primary,
            TimerMode::Break => self.secondary,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn gauge_style(&self, mode: TimerMode) -> Style {
        self.mode_style(mode).bg(self.muted)
    }

    pub fn done_style(&self) -> Style {
        Style::default().fg(Color::Green)
    }

    /// Tag badge style
    pub fn tag_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }
}

pub fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Gray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_theme_uses_settings_colors() {
        let mut settings = Settings::default();
        settings.set_primary_color("#102030").unwrap();
        settings.dark_mode = true;

        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.primary, Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(theme.background, Color::Black);

        settings.dark_mode = false;
        let light = Theme::from_settings(&settings);
        assert_eq!(light.background, Color::White);
        assert_eq!(light.foreground, Color::Black);
    }
}
