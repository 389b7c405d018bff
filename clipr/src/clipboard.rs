use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use compact_str::CompactString;
use tracing::{debug, warn};

use crate::config::{ClipboardBackend, ClipboardConfig};
use crate::error::{ClipError, ClipResult};

/// Destination for copied text.
pub trait ClipboardSink: Send {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> ClipResult<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// System clipboard via `arboard`.
///
/// The connection is opened on first use and kept for the lifetime of the
/// sink: on X11 the copied text only stays available while the owning
/// `arboard::Clipboard` is alive.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn connection(&mut self) -> ClipResult<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                warn!("Failed to open system clipboard: {e}");
                ClipError::Unavailable(CompactString::from(e.to_string()))
            })?;
            self.inner = Some(clipboard);
        }

        self.inner
            .as_mut()
            .ok_or_else(|| ClipError::Unavailable(CompactString::const_new("not connected")))
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> ClipResult<()> {
        if text.is_empty() {
            return Err(ClipError::EmptyPayload);
        }

        let result = self.connection()?.set_text(text.to_owned());
        if result.is_err() {
            // Drop the connection so the next attempt reconnects.
            self.inner = None;
        }
        result.map_err(ClipError::from)?;

        debug!(bytes = text.len(), "Copied text to system clipboard");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "system"
    }
}

/// In-process clipboard that records every copy.
///
/// Clones share the same history, so a caller can keep a handle while the
/// sink itself is boxed away inside an application.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    history: Arc<Mutex<VecDeque<CompactString>>>,
    max_history: usize,
    reject_writes: bool,
}

impl MemoryClipboard {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: Arc::new(Mutex::new(VecDeque::with_capacity(max_history.min(64)))),
            max_history: max_history.max(1),
            reject_writes: false,
        }
    }

    /// A clipboard whose writes always fail.
    pub fn rejecting() -> Self {
        Self {
            reject_writes: true,
            ..Self::new(1)
        }
    }

    /// Most recently copied text.
    pub fn last(&self) -> Option<String> {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.back().map(|text| text.to_string())
    }

    pub fn len(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> ClipResult<()> {
        if self.reject_writes {
            return Err(ClipError::WriteFailed(CompactString::const_new(
                "memory clipboard rejects writes",
            )));
        }
        if text.is_empty() {
            return Err(ClipError::EmptyPayload);
        }

        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() == self.max_history {
            history.pop_front();
        }
        history.push_back(CompactString::from(text));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Build the sink selected in `config`.
pub fn sink_from_config(config: &ClipboardConfig) -> Box<dyn ClipboardSink> {
    match config.backend {
        ClipboardBackend::System => Box::new(SystemClipboard::new()),
        ClipboardBackend::Memory => Box::new(MemoryClipboard::new(config.max_history)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records_last_copy() {
        let handle = MemoryClipboard::new(4);
        let mut sink: Box<dyn ClipboardSink> = Box::new(handle.clone());

        sink.set_text("alice").unwrap();
        sink.set_text("alice\nbob").unwrap();

        assert_eq!(handle.last().as_deref(), Some("alice\nbob"));
        assert_eq!(handle.len(), 2);
    }

    #[test]
    fn test_memory_clipboard_history_is_bounded() {
        let mut clipboard = MemoryClipboard::new(2);
        for text in ["a", "b", "c"] {
            clipboard.set_text(text).unwrap();
        }

        assert_eq!(clipboard.len(), 2);
        assert_eq!(clipboard.last().as_deref(), Some("c"));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let mut clipboard = MemoryClipboard::new(2);
        assert_eq!(clipboard.set_text(""), Err(ClipError::EmptyPayload));
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_rejecting_clipboard_fails() {
        let mut clipboard = MemoryClipboard::rejecting();
        assert!(matches!(
            clipboard.set_text("alice"),
            Err(ClipError::WriteFailed(_))
        ));
    }

    #[test]
    fn test_sink_from_config_memory_backend() {
        let config = ClipboardConfig {
            backend: ClipboardBackend::Memory,
            max_history: 3,
        };
        let sink = sink_from_config(&config);
        assert_eq!(sink.backend_name(), "memory");
    }
}
