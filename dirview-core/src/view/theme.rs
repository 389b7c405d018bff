//! src/view/theme.rs
//! ============================================================================
//! # Color palettes
//!
//! Dark uses Catppuccin Mocha, light uses Catppuccin Latte:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};

use crate::model::{notification::NotificationLevel, theme_mode::ThemeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

pub const MOCHA: Palette = Palette {
    background: Color::Rgb(30, 30, 46),   // Base
    surface: Color::Rgb(69, 71, 90),      // Surface1
    foreground: Color::Rgb(205, 214, 244), // Text
    muted: Color::Rgb(127, 132, 156),     // Overlay1
    accent: Color::Rgb(203, 166, 247),    // Mauve
    highlight: Color::Rgb(137, 220, 235), // Sky
    success: Color::Rgb(166, 227, 161),   // Green
    error: Color::Rgb(243, 139, 168),     // Red
    warning: Color::Rgb(249, 226, 175),   // Yellow
};

pub const LATTE: Palette = Palette {
    background: Color::Rgb(239, 241, 245), // Base
    surface: Color::Rgb(188, 192, 204),    // Surface1
    foreground: Color::Rgb(76, 79, 105),   // Text
    muted: Color::Rgb(140, 143, 161),      // Overlay1
    accent: Color::Rgb(136, 57, 239),      // Mauve
    highlight: Color::Rgb(4, 165, 229),    // Sky
    success: Color::Rgb(64, 160, 43),      // Green
    error: Color::Rgb(210, 15, 57),        // Red
    warning: Color::Rgb(223, 142, 29),     // Yellow
};

impl Palette {
    pub const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => MOCHA,
            ThemeMode::Light => LATTE,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected_row(&self) -> Style {
        Style::default()
            .bg(self.surface)
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }

    pub fn active_tab(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn match_highlight(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn notification(&self, level: NotificationLevel) -> Style {
        match level {
            NotificationLevel::Success => Style::default().fg(self.success),
            NotificationLevel::Error => Style::default().fg(self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_follows_mode() {
        assert_eq!(Palette::for_mode(ThemeMode::Dark), MOCHA);
        assert_eq!(Palette::for_mode(ThemeMode::Light), LATTE);
        assert_ne!(MOCHA.background, LATTE.background);
    }
}
