//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Directory Browser
//!
//! Every fallible library operation returns `Result<T, AppError>`. The
//! controller never shows these messages to the user verbatim: it logs them
//! and maps them onto a generic empty state or notification.

use std::{io, path::PathBuf};

use clipr::ClipError;
use thiserror::Error;

/// Unified error type for all directory browser operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level failure talking to the directory API.
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The directory API answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body was not the JSON shape we expect.
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A base URL or endpoint could not be composed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML serialization error when writing config or preferences.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config or preference file I/O error with path.
    #[error("Failed to access {path:?}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No platform directory could be resolved for config or data files.
    #[error("Could not determine {0} directory")]
    NoProjectDirs(&'static str),

    /// Clipboard backend failure.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipError),

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    pub fn http(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn decode(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn file_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// True for failures coming from the remote directory API.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Status { .. } | Self::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = AppError::status("/categories", 503);
        assert_eq!(err.to_string(), "/categories returned HTTP 503");
        assert!(err.is_remote());
    }

    #[test]
    fn test_clipboard_error_is_not_remote() {
        let err: AppError = ClipError::EmptyPayload.into();
        assert!(!err.is_remote());
        assert!(err.to_string().contains("Nothing to copy"));
    }
}
