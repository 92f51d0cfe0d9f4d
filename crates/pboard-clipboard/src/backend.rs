//! The OS pasteboard seam.

use crate::error::ClipboardError;

/// Live access to a pasteboard.
///
/// Implementations must never cache content or the change counter: every
/// call re-queries the underlying pasteboard, since another process may
/// replace its content between any two calls. Items are indexed in
/// pasteboard order, starting at 0.
pub trait PasteboardBackend: Send + Sync + 'static {
    /// Counter incremented by the OS on every content change.
    fn change_count(&self) -> Result<i64, ClipboardError>;

    /// Number of items currently on the pasteboard.
    fn item_count(&self) -> Result<usize, ClipboardError>;

    /// Declared type identifiers of one item, in the order the item lists
    /// them. Empty when `index` is out of range.
    fn item_types(&self, index: usize) -> Result<Vec<String>, ClipboardError>;

    /// Bytes of one item for one declared type, or `None` when the item does
    /// not provide it. Text types yield UTF-8.
    fn item_data(&self, index: usize, declared_type: &str)
        -> Result<Option<Vec<u8>>, ClipboardError>;

    /// Filesystem paths of every file reference on the pasteboard, one per
    /// referenced file.
    fn file_paths(&self) -> Result<Vec<String>, ClipboardError>;

    /// Replace the whole pasteboard content with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
