//! src/view/components/tab_bar.rs
//! Category tabs. When the strip is wider than the screen, only a window
//! around the focused tab is drawn and `‹` / `›` mark the hidden sides.

use std::ops::Range;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::view::{theme::Palette, view_model::TabView};

const SEPARATOR: &str = " │ ";
const LEFT_MORE: &str = "‹ ";
const RIGHT_MORE: &str = " ›";

pub struct TabBar;

impl Default for TabBar {
    fn default() -> Self {
        Self::new()
    }
}

impl TabBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, tabs: &[TabView], palette: &Palette, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Categories ")
            .border_style(palette.border())
            .style(palette.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if tabs.is_empty() {
            frame.render_widget(Paragraph::new("No categories").style(palette.dim()), inner);
            return;
        }

        let widths: Vec<u16> = tabs.iter().map(tab_width).collect();
        let focus = tabs.iter().position(|t| t.focused).unwrap_or(0);
        let window = visible_window(&widths, inner.width, focus);

        let mut spans = Vec::with_capacity(window.len() * 2 + 2);
        if window.start > 0 {
            spans.push(Span::styled(LEFT_MORE, palette.dim()));
        }
        for (offset, tab) in tabs[window.clone()].iter().enumerate() {
            if offset > 0 {
                spans.push(Span::styled(SEPARATOR, palette.dim()));
            }
            let mut style = if tab.active {
                palette.active_tab()
            } else {
                palette.base()
            };
            if tab.focused {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!(" {} ", tab.name), style));
        }
        if window.end < tabs.len() {
            spans.push(Span::styled(RIGHT_MORE, palette.dim()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}

fn tab_width(tab: &TabView) -> u16 {
    let label = Span::raw(tab.name.as_str()).width() + 2;
    u16::try_from(label + Span::raw(SEPARATOR).width()).unwrap_or(u16::MAX)
}

/// Range of tabs that fit in `available` columns while keeping `focus`
/// visible. `widths` include the separator after each tab.
pub fn visible_window(widths: &[u16], available: u16, focus: usize) -> Range<usize> {
    if widths.is_empty() {
        return 0..0;
    }
    let focus = focus.min(widths.len() - 1);

    let total: u32 = widths.iter().map(|w| u32::from(*w)).sum();
    if total <= u32::from(available) {
        return 0..widths.len();
    }

    let indicators = Span::raw(LEFT_MORE).width() + Span::raw(RIGHT_MORE).width();
    let budget = u32::from(available).saturating_sub(indicators as u32);
    let fill_from = |start: usize| {
        let mut used = 0u32;
        let mut end = start;
        while end < widths.len() && used + u32::from(widths[end]) <= budget {
            used += u32::from(widths[end]);
            end += 1;
        }
        end
    };

    let mut start = 0;
    let mut end = fill_from(start);
    while focus >= end && start < focus {
        start += 1;
        end = fill_from(start);
    }

    start..end.max(focus + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_fits() {
        assert_eq!(visible_window(&[10, 10, 10], 30, 2), 0..3);
        assert_eq!(visible_window(&[], 30, 0), 0..0);
    }

    #[test]
    fn test_window_follows_focus() {
        let widths = [10; 6];
        assert_eq!(visible_window(&widths, 34, 0), 0..3);
        assert_eq!(visible_window(&widths, 34, 2), 0..3);
        assert_eq!(visible_window(&widths, 34, 4), 2..5);
        assert_eq!(visible_window(&widths, 34, 5), 3..6);
    }

    #[test]
    fn test_focused_tab_always_included() {
        // Too narrow for any tab; the focused one is still drawn.
        assert_eq!(visible_window(&[20, 20, 20], 10, 1), 1..2);
        assert_eq!(visible_window(&[20, 20], 10, 9), 1..2);
    }
}
