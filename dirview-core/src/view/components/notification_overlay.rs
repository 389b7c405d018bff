//! src/view/components/notification_overlay.rs
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::trace;

use crate::{
    model::notification::{Notification, NotificationLevel},
    view::theme::Palette,
};

pub struct NotificationOverlay;

impl Default for NotificationOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render_notification(
        &self,
        frame: &mut Frame<'_>,
        notification: &Notification,
        palette: &Palette,
        area: Rect,
    ) {
        trace!(
            level = ?notification.level,
            message_len = notification.message.len(),
            "Rendering notification overlay"
        );

        frame.render_widget(Clear, area);

        let style = palette.notification(notification.level);
        let icon = match notification.level {
            NotificationLevel::Success => "✓",
            NotificationLevel::Error => "✕",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .style(palette.base());

        let message = Paragraph::new(Line::from(vec![
            Span::styled(format!("{icon} "), style.add_modifier(Modifier::BOLD)),
            Span::raw(notification.message.as_str()),
        ]))
        .block(block)
        .wrap(Wrap { trim: true });

        frame.render_widget(message, area);
    }

    /// Top-right corner box sized to the message.
    pub fn area_for(screen: Rect, message: &str) -> Rect {
        let wanted = u16::try_from(Span::raw(message).width() + 6).unwrap_or(u16::MAX);
        let width = wanted.min(screen.width);
        Rect {
            x: screen.x + screen.width - width,
            y: screen.y + 1,
            width,
            height: 3.min(screen.height.saturating_sub(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_fits_inside_screen() {
        let screen = Rect::new(0, 0, 20, 10);
        let area = NotificationOverlay::area_for(screen, "Copied all 12345 usernames");
        assert_eq!(area.width, 20);
        assert_eq!(area.x, 0);

        let small = NotificationOverlay::area_for(Rect::new(0, 0, 80, 24), "Copied @bob");
        assert_eq!(small.width, 17);
        assert_eq!(small.x + small.width, 80);
    }
}
