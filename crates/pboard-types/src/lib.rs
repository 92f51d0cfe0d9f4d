//! Shared types for pboard.
//!
//! Plain data exchanged across the clipboard boundary: the classification
//! record, the raw payload, the read filter, and the stable format tags.

pub mod board;
pub mod clipboard;
pub mod error;
pub mod filter;

pub use board::Board;
pub use clipboard::{ClipboardData, ClipboardInformation, ContentType, FormatTag};
pub use error::TagError;
pub use filter::ClipboardTypeFilter;
