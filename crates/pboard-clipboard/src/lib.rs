//! System pasteboard access for pboard.
//!
//! [`ClipboardHandle`] is the capability every operation goes through. It
//! wraps a [`PasteboardBackend`]: the macOS general pasteboard from
//! [`open_handle`], or any substitute such as [`mock::MockPasteboard`].
//!
//! Reads classify the first pasteboard item against the ordered table in
//! [`format::FORMAT_PRIORITY`] and return the raw bytes of the winning
//! representation. Writes replace the whole pasteboard with text.

pub mod access;
pub mod backend;
pub mod error;
pub mod format;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod mock;
pub mod monitor;

pub use access::{open_board, open_handle, ClipboardHandle};
pub use backend::PasteboardBackend;
pub use error::ClipboardError;
pub use monitor::{ClipboardChange, Monitor};
