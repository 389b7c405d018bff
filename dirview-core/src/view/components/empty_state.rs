//! src/view/components/empty_state.rs
//! Centered placeholder panels: loading, welcome, and empty/error states.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::view::theme::Palette;

pub struct EmptyState;

impl Default for EmptyState {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyState {
    pub fn new() -> Self {
        Self
    }

    pub fn render_loading(&self, frame: &mut Frame<'_>, label: &str, palette: &Palette, area: Rect) {
        let lines = vec![Line::styled(label, Style::default().fg(palette.warning))];
        self.render_lines(frame, lines, palette, area);
    }

    pub fn render_welcome(&self, frame: &mut Frame<'_>, category_count: usize, palette: &Palette, area: Rect) {
        let lines = vec![
            Line::styled("Welcome", palette.base().add_modifier(Modifier::BOLD)),
            Line::raw(""),
            Line::styled(
                format!("Pick one of {category_count} categories above, or press / to search."),
                palette.dim(),
            ),
        ];
        self.render_lines(frame, lines, palette, area);
    }

    pub fn render_message(&self, frame: &mut Frame<'_>, title: &str, message: &str, palette: &Palette, area: Rect) {
        let lines = vec![
            Line::styled(title, palette.base().add_modifier(Modifier::BOLD)),
            Line::raw(""),
            Line::styled(message, palette.dim()),
        ];
        self.render_lines(frame, lines, palette, area);
    }

    fn render_lines(&self, frame: &mut Frame<'_>, lines: Vec<Line<'_>>, palette: &Palette, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .style(palette.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            middle,
        );
    }
}
