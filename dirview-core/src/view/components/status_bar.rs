//! src/view/components/status_bar.rs - location on the left, key hints on the right

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::{model::theme_mode::ThemeMode, view::theme::Palette};

const HINTS: &str = "/ search · Tab category · n/p page · Alt+←/→ history · t theme · q quit";

pub struct StatusBar;

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, location: &str, theme: ThemeMode, palette: &Palette, area: Rect) {
        let style = Style::default().fg(palette.foreground).bg(palette.surface);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        Paragraph::new(format!(" dirview {location} [{theme}]"))
            .style(style)
            .alignment(Alignment::Left)
            .render(layout[0], frame.buffer_mut());

        Paragraph::new(format!("{HINTS} "))
            .style(style)
            .alignment(Alignment::Right)
            .render(layout[1], frame.buffer_mut());
    }
}
