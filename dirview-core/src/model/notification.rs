//! Transient toast notifications.

use std::time::{Duration, Instant};

use compact_str::CompactString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Success = 0,
    Error = 1,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss: Duration,
}

impl Notification {
    pub fn new(
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss: Duration,
        now: Instant,
    ) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: now,
            auto_dismiss,
        }
    }

    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) >= self.auto_dismiss
    }
}

/// Holds at most one notification; a new one replaces the current one and
/// restarts the dismissal timer.
#[derive(Debug, Clone)]
pub struct Toast {
    current: Option<Notification>,
    auto_dismiss: Duration,
}

impl Toast {
    pub fn new(auto_dismiss: Duration) -> Self {
        Self {
            current: None,
            auto_dismiss,
        }
    }

    pub fn show(&mut self, message: impl Into<CompactString>, level: NotificationLevel, now: Instant) {
        self.current = Some(Notification::new(message, level, self.auto_dismiss, now));
    }

    #[inline]
    pub fn success(&mut self, message: impl Into<CompactString>, now: Instant) {
        self.show(message, NotificationLevel::Success, now);
    }

    #[inline]
    pub fn error(&mut self, message: impl Into<CompactString>, now: Instant) {
        self.show(message, NotificationLevel::Error, now);
    }

    /// Drop the notification once its time is up. Returns true when
    /// something was dismissed.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
