use serde::{Deserialize, Serialize};

/// Which clipboard implementation the application should talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardBackend {
    #[default]
    System,

    /// Keep copies inside the process (headless sessions, CI).
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub backend: ClipboardBackend,

    /// Maximum number of copied entries remembered in history
    pub max_history: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            backend: ClipboardBackend::System,
            max_history: 50,
        }
    }
}
