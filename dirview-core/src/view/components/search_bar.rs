//! src/view/components/search_bar.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::view::{theme::Palette, view_model::SearchBoxView};

const PLACEHOLDER: &str = "Press / to search usernames";

pub struct SearchBar;

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, search: &SearchBoxView, palette: &Palette, area: Rect) {
        let border = if search.focused {
            Style::default().fg(palette.highlight)
        } else {
            palette.border()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(border)
            .style(palette.base());
        if search.searching {
            block = block.title_bottom(Line::styled(" Searching… ", palette.dim()).right_aligned());
        } else if search.clear_visible {
            block = block.title_bottom(Line::styled(" Esc clear ", palette.dim()).right_aligned());
        }

        let line = if search.text.is_empty() && !search.focused {
            Line::styled(PLACEHOLDER, palette.dim())
        } else {
            let mut spans = vec![Span::raw(search.text.as_str())];
            if search.focused {
                spans.push(Span::styled("▏", Style::default().fg(palette.highlight)));
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
