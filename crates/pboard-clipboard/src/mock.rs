//! In-memory pasteboard for tests and headless use.

use std::sync::{Arc, Mutex};

use pboard_types::FormatTag;

use crate::backend::PasteboardBackend;
use crate::error::ClipboardError;
use crate::format::{self, UTI_FILE_URL, UTI_UTF8_TEXT};

/// One pasteboard item: an ordered list of declared types, each with the
/// bytes it provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockItem {
    /// `(declared type, data)`; `None` data models a type the item declares
    /// but fails to provide.
    representations: Vec<(String, Option<Vec<u8>>)>,
}

impl MockItem {
    /// Item with no declared types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text item.
    pub fn text(s: &str) -> Self {
        Self::new().with_type(UTI_UTF8_TEXT, s.as_bytes().to_vec())
    }

    /// Image item in a single format.
    ///
    /// # Panics
    ///
    /// Panics if `format` is not an image format.
    pub fn image(format: FormatTag, bytes: Vec<u8>) -> Self {
        let rule = format::rule_for(format)
            .filter(|r| r.format.is_image())
            .unwrap_or_else(|| panic!("not an image format: {format}"));
        Self::new().with_type(rule.declared_type, bytes)
    }

    /// File reference item. The URL is stored without percent-encoding.
    pub fn file(path: &str) -> Self {
        Self::new().with_type(UTI_FILE_URL, format!("file://{path}").into_bytes())
    }

    /// Declare an additional type with its data.
    #[must_use]
    pub fn with_type(mut self, declared_type: &str, bytes: Vec<u8>) -> Self {
        self.representations
            .push((declared_type.to_string(), Some(bytes)));
        self
    }

    /// Declare a type whose data never materialises.
    #[must_use]
    pub fn with_promised_type(mut self, declared_type: &str) -> Self {
        self.representations.push((declared_type.to_string(), None));
        self
    }

    fn types(&self) -> Vec<String> {
        self.representations.iter().map(|(t, _)| t.clone()).collect()
    }

    fn data(&self, declared_type: &str) -> Option<Vec<u8>> {
        self.representations
            .iter()
            .find(|(t, _)| t == declared_type)
            .and_then(|(_, data)| data.clone())
    }

    /// Path named by the item's `file://` URL, with or without a
    /// `localhost` authority.
    fn file_path(&self) -> Option<String> {
        let data = self.data(UTI_FILE_URL)?;
        let url = String::from_utf8(data).ok()?;
        let rest = url.strip_prefix("file://")?;
        let path = rest.strip_prefix("localhost").unwrap_or(rest);
        path.starts_with('/').then(|| path.to_string())
    }
}

#[derive(Debug, Default)]
struct MockState {
    items: Vec<MockItem>,
    change_count: i64,
    unavailable: Option<String>,
    reject_writes: bool,
}

impl MockState {
    fn check(&self) -> Result<(), ClipboardError> {
        match &self.unavailable {
            Some(reason) => Err(ClipboardError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Mock pasteboard backend.
///
/// Behaves like the OS pasteboard: writes replace every item and bump the
/// change counter.
pub struct MockPasteboard {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockPasteboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPasteboard {
    /// Create an empty mock pasteboard.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Get a clonable handle for driving and observing the pasteboard from
    /// tests.
    pub fn handle(&self) -> MockPasteboardHandle {
        MockPasteboardHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable control handle for `MockPasteboard`.
///
/// Tests use this to play the part of other applications copying content.
#[derive(Clone)]
pub struct MockPasteboardHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockPasteboardHandle {
    /// Replace the pasteboard content, as another application would.
    pub fn set_items(&self, items: Vec<MockItem>) {
        let mut state = self.state.lock().unwrap();
        state.items = items;
        state.change_count += 1;
    }

    /// Empty the pasteboard.
    pub fn clear(&self) {
        self.set_items(Vec::new());
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<MockItem> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn change_count(&self) -> i64 {
        self.state.lock().unwrap().change_count
    }

    /// Make every operation fail with `Unavailable`, or restore service.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.state.lock().unwrap().unavailable = reason.map(str::to_string);
    }

    /// Make writes fail with `WriteRejected`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.state.lock().unwrap().reject_writes = reject;
    }
}

impl PasteboardBackend for MockPasteboard {
    fn change_count(&self) -> Result<i64, ClipboardError> {
        let state = self.state.lock().unwrap();
        state.check()?;
        Ok(state.change_count)
    }

    fn item_count(&self) -> Result<usize, ClipboardError> {
        let state = self.state.lock().unwrap();
        state.check()?;
        Ok(state.items.len())
    }

    fn item_types(&self, index: usize) -> Result<Vec<String>, ClipboardError> {
        let state = self.state.lock().unwrap();
        state.check()?;
        Ok(state.items.get(index).map(MockItem::types).unwrap_or_default())
    }

    fn item_data(
        &self,
        index: usize,
        declared_type: &str,
    ) -> Result<Option<Vec<u8>>, ClipboardError> {
        let state = self.state.lock().unwrap();
        state.check()?;
        Ok(state
            .items
            .get(index)
            .and_then(|item| item.data(declared_type)))
    }

    fn file_paths(&self) -> Result<Vec<String>, ClipboardError> {
        let state = self.state.lock().unwrap();
        state.check()?;
        Ok(state
            .items
            .iter()
            .filter_map(MockItem::file_path)
            .collect())
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        if state.reject_writes {
            return Err(ClipboardError::WriteRejected(
                "pasteboard locked by another process".to_string(),
            ));
        }
        state.items = vec![MockItem::text(text)];
        state.change_count += 1;
        Ok(())
    }
}
