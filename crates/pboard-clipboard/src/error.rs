//! Clipboard subsystem errors.

use pboard_types::Board;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("pasteboard rejected write: {0}")]
    WriteRejected(String),

    #[error("board not available on this platform: {0}")]
    NoBoard(Board),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipboardError {
    /// Whether the OS clipboard could not be reached or refused the
    /// operation. Callers decide whether to retry.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::WriteRejected(_))
    }
}
