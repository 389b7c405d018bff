//! src/view/components/username_grid.rs
//! ============================================================================
//! Result cards for the current page: a category's usernames or the matches
//! of a search. Each row shows the handle, a profile link and, for search
//! results, the owning category with the matched text emphasised.

use std::ops::Range;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};
use tracing::trace;

use crate::view::{
    theme::Palette,
    view_model::{SearchCard, UserCard},
};

pub struct UsernameGrid;

impl Default for UsernameGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl UsernameGrid {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_category(
        &self,
        frame: &mut Frame<'_>,
        title: &str,
        count_label: &str,
        cards: &[UserCard],
        state: &mut ListState,
        palette: &Palette,
        area: Rect,
    ) {
        trace!(cards = cards.len(), "Rendering category page");

        let items: Vec<ListItem<'_>> = cards
            .iter()
            .map(|card| {
                ListItem::new(Line::from(vec![
                    Span::styled(card.handle(), palette.base().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(card.profile_url.as_str(), palette.dim()),
                ]))
            })
            .collect();

        let block = Self::block(format!(" {title} · {count_label} "), palette);
        Self::draw(frame, items, block, state, palette, area);
    }

    pub fn render_search(
        &self,
        frame: &mut Frame<'_>,
        count_label: &str,
        cards: &[SearchCard],
        state: &mut ListState,
        palette: &Palette,
        area: Rect,
    ) {
        trace!(cards = cards.len(), "Rendering search page");

        let items: Vec<ListItem<'_>> = cards
            .iter()
            .map(|card| {
                let base = palette.base().add_modifier(Modifier::BOLD);
                let mut spans = vec![Span::styled("@", base)];
                spans.extend(highlight_spans(
                    &card.username,
                    &card.highlights,
                    base,
                    palette.match_highlight(),
                ));
                spans.push(Span::styled(format!("  {}", card.category), palette.dim()));
                spans.push(Span::raw("  "));
                spans.push(Span::styled(card.profile_url.as_str(), palette.dim()));
                ListItem::new(Line::from(spans))
            })
            .collect();

        let block = Self::block(format!(" Search results · {count_label} "), palette);
        Self::draw(frame, items, block, state, palette, area);
    }

    fn block(title: String, palette: &Palette) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(Line::styled(" y copy · Y copy all · o open ", palette.dim()).right_aligned())
            .border_style(palette.border())
            .style(palette.base())
    }

    fn draw(
        frame: &mut Frame<'_>,
        items: Vec<ListItem<'_>>,
        block: Block<'_>,
        state: &mut ListState,
        palette: &Palette,
        area: Rect,
    ) {
        let list = List::new(items)
            .block(block)
            .highlight_style(palette.selected_row())
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, state);
    }
}

/// Split `text` into spans, styling the given byte ranges with `emphasis`.
/// Ranges must be sorted, non-overlapping and on char boundaries.
pub fn highlight_spans<'a>(
    text: &'a str,
    ranges: &[Range<usize>],
    base: Style,
    emphasis: Style,
) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut pos = 0;

    for range in ranges {
        let (Some(before), Some(hit)) = (text.get(pos..range.start), text.get(range.clone())) else {
            continue;
        };
        if !before.is_empty() {
            spans.push(Span::styled(before, base));
        }
        spans.push(Span::styled(hit, emphasis));
        pos = range.end;
    }

    if let Some(rest) = text.get(pos..) {
        if !rest.is_empty() {
            spans.push(Span::styled(rest, base));
        }
    }
    spans
}
