//! Type conversion errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unknown format tag: {0}")]
    Format(u8),

    #[error("unknown content type tag: {0}")]
    ContentType(u8),
}
