//! src/view/components/pagination_bar.rs

use ratatui::{prelude::*, widgets::Paragraph};

use crate::view::{theme::Palette, view_model::PaginationView};

pub struct PaginationBar;

impl Default for PaginationBar {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, view: &PaginationView, palette: &Palette, area: Rect) {
        let control = |label: &'static str, enabled: bool| {
            if enabled {
                Span::styled(label, Style::default().fg(palette.accent))
            } else {
                Span::styled(label, palette.dim().add_modifier(Modifier::CROSSED_OUT))
            }
        };

        let line = Line::from(vec![
            control("‹ Prev (p)", view.prev_enabled),
            Span::raw("   "),
            Span::styled(view.label(), palette.base()),
            Span::raw("   "),
            control("Next (n) ›", view.next_enabled),
        ]);

        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}
