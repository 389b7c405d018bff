//! Clipboard error handling

use compact_str::CompactString;
use thiserror::Error;

pub type ClipResult<T> = Result<T, ClipError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("Clipboard backend unavailable: {0}")]
    Unavailable(CompactString),

    #[error("Clipboard write rejected: {0}")]
    WriteFailed(CompactString),

    #[error("Nothing to copy")]
    EmptyPayload,
}

impl ClipError {
    /// Errors that may go away when the user tries again.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, ClipError::WriteFailed(_))
    }
}

impl From<arboard::Error> for ClipError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ClipboardNotSupported => {
                ClipError::Unavailable(CompactString::const_new("not supported on this platform"))
            }
            other => ClipError::WriteFailed(CompactString::from(other.to_string())),
        }
    }
}
