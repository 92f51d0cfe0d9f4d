//! Clipboard access operations.

use std::sync::Arc;

use pboard_types::{Board, ClipboardData, ClipboardInformation, ClipboardTypeFilter, ContentType};
use tracing::{debug, trace, warn};

use crate::backend::PasteboardBackend;
use crate::error::ClipboardError;
use crate::format;

/// Capability token for a pasteboard.
///
/// Holds no clipboard state of its own; every operation is a fresh
/// round-trip to the backend. Cheap to clone and safe to share across
/// threads.
#[derive(Clone)]
pub struct ClipboardHandle {
    backend: Arc<dyn PasteboardBackend>,
}

impl std::fmt::Debug for ClipboardHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardHandle").finish_non_exhaustive()
    }
}

/// Open the system pasteboard.
pub fn open_handle() -> Result<ClipboardHandle, ClipboardError> {
    open_board(Board::Default)
}

/// Open a specific clipboard board.
///
/// The macOS pasteboard only has [`Board::Default`].
pub fn open_board(board: Board) -> Result<ClipboardHandle, ClipboardError> {
    if board != Board::Default {
        return Err(ClipboardError::NoBoard(board));
    }
    open_system()
}

#[cfg(target_os = "macos")]
fn open_system() -> Result<ClipboardHandle, ClipboardError> {
    debug!("opening general pasteboard");
    let backend = crate::macos::MacPasteboard::open()?;
    Ok(ClipboardHandle::with_backend(Arc::new(backend)))
}

#[cfg(not(target_os = "macos"))]
fn open_system() -> Result<ClipboardHandle, ClipboardError> {
    Err(ClipboardError::Unavailable(format!(
        "no system pasteboard backend for {}",
        std::env::consts::OS
    )))
}

/// Attempts at a multi-call operation before giving up on a pasteboard that
/// keeps changing underneath it.
const MAX_ATTEMPTS: usize = 3;

impl ClipboardHandle {
    /// Build a handle over any backend.
    pub fn with_backend(backend: Arc<dyn PasteboardBackend>) -> Self {
        Self { backend }
    }

    /// Current OS change counter.
    pub fn change_count(&self) -> Result<i64, ClipboardError> {
        self.backend.change_count()
    }

    /// Classify the first item without extracting its payload.
    pub fn query_information(&self) -> Result<ClipboardInformation, ClipboardError> {
        self.consistent("query", || self.query_once())
    }

    /// Classify the first item under `filter` and extract its payload.
    ///
    /// When nothing matches, the result is an empty payload with
    /// [`ContentType::None`]; that is not an error.
    pub fn read(
        &self,
        filter: &ClipboardTypeFilter,
    ) -> Result<(ClipboardData, ClipboardInformation), ClipboardError> {
        self.consistent("read", || self.read_once(filter))
    }

    /// Replace the whole clipboard with `text`.
    pub fn write(&self, text: &str) -> Result<(), ClipboardError> {
        self.backend.write_text(text)?;
        debug!(bytes = text.len(), "wrote text to clipboard");
        Ok(())
    }

    /// Declared type identifiers of the first item.
    pub fn declared_types(&self) -> Result<Vec<String>, ClipboardError> {
        self.consistent("declared types", || {
            if self.backend.item_count()? == 0 {
                return Ok(Vec::new());
            }
            self.backend.item_types(0)
        })
    }

    /// Bytes of the first item for one declared type, if it provides it.
    pub fn read_raw(&self, declared_type: &str) -> Result<Option<ClipboardData>, ClipboardError> {
        self.consistent("raw read", || {
            if self.backend.item_count()? == 0 {
                return Ok(None);
            }
            Ok(self
                .backend
                .item_data(0, declared_type)?
                .map(ClipboardData::new))
        })
    }

    /// Run `op` between two change-counter reads and keep the result only
    /// when the counter did not move, so a result never mixes two
    /// pasteboard states.
    fn consistent<T>(
        &self,
        op: &'static str,
        mut attempt: impl FnMut() -> Result<T, ClipboardError>,
    ) -> Result<T, ClipboardError> {
        for n in 1..=MAX_ATTEMPTS {
            let before = self.backend.change_count()?;
            let value = attempt()?;
            let after = self.backend.change_count()?;
            if before == after {
                return Ok(value);
            }
            debug!(op, attempt = n, before, after, "clipboard changed mid-operation, retrying");
        }
        warn!(op, attempts = MAX_ATTEMPTS, "clipboard kept changing");
        Err(ClipboardError::Unavailable(format!(
            "clipboard changed during {op} on {MAX_ATTEMPTS} attempts"
        )))
    }

    fn query_once(&self) -> Result<ClipboardInformation, ClipboardError> {
        let item_count = self.backend.item_count()?;
        if item_count == 0 {
            return Ok(ClipboardInformation::empty(0));
        }

        let declared = self.backend.item_types(0)?;
        let info = match format::select(&declared, &ClipboardTypeFilter::all()) {
            Some(rule) => rule.information(item_count),
            None => ClipboardInformation::other(item_count),
        };
        trace!(?declared, %info, "classified clipboard");
        Ok(info)
    }

    fn read_once(
        &self,
        filter: &ClipboardTypeFilter,
    ) -> Result<(ClipboardData, ClipboardInformation), ClipboardError> {
        let item_count = self.backend.item_count()?;
        if item_count == 0 || filter.is_empty() {
            debug!(item_count, ?filter, "nothing to read");
            return Ok((ClipboardData::empty(), ClipboardInformation::empty(item_count)));
        }

        let declared = self.backend.item_types(0)?;
        for rule in format::candidates(&declared, filter) {
            let payload = match rule.content_type {
                ContentType::Files => {
                    let paths = self.backend.file_paths()?;
                    (!paths.is_empty()).then(|| ClipboardData::from_paths(&paths))
                }
                _ => self
                    .backend
                    .item_data(0, rule.declared_type)?
                    .map(ClipboardData::new),
            };

            match payload {
                Some(data) => {
                    debug!(
                        content_type = %rule.content_type,
                        format = %rule.format,
                        bytes = data.len(),
                        item_count,
                        "read clipboard"
                    );
                    return Ok((data, rule.information(item_count)));
                }
                None => {
                    debug!(declared_type = rule.declared_type, "declared type yielded no data");
                }
            }
        }

        debug!(?declared, ?filter, "no declared type matched filter");
        Ok((ClipboardData::empty(), ClipboardInformation::empty(item_count)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pboard_types::FormatTag;

    use super::*;
    use crate::format::{UTI_BMP, UTI_FILE_URL, UTI_JPEG, UTI_PNG, UTI_UTF8_TEXT};
    use crate::mock::{MockItem, MockPasteboard, MockPasteboardHandle};

    fn mock() -> (ClipboardHandle, MockPasteboardHandle) {
        let pasteboard = MockPasteboard::new();
        let control = pasteboard.handle();
        (ClipboardHandle::with_backend(Arc::new(pasteboard)), control)
    }

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn empty_clipboard_reads_nothing() {
        let (handle, _) = mock();
        let (data, info) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert_eq!(data.len(), 0);
        assert_eq!(info, ClipboardInformation::empty(0));
        assert_eq!(handle.query_information().unwrap(), ClipboardInformation::empty(0));
    }

    #[test]
    fn empty_filter_is_not_an_error() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::text("hello")]);
        let (data, info) = handle.read(&ClipboardTypeFilter::none()).unwrap();
        assert!(data.is_empty());
        assert_eq!(info.content_type, ContentType::None);
        assert_eq!(info.format, FormatTag::None);
    }

    #[test]
    fn write_then_read_text() {
        let (handle, _) = mock();
        handle.write("hello").unwrap();
        let (data, info) = handle.read(&ClipboardTypeFilter::text_only()).unwrap();
        assert_eq!(data.as_bytes(), b"hello");
        assert_eq!(info.content_type, ContentType::Text);
        assert_eq!(info.format, FormatTag::Utf8Text);
        assert_eq!(info.item_count, 1);
    }

    #[test]
    fn write_bumps_change_count() {
        let (handle, _) = mock();
        let before = handle.change_count().unwrap();
        handle.write("one").unwrap();
        let after_one = handle.change_count().unwrap();
        handle.write("two").unwrap();
        let after_two = handle.change_count().unwrap();
        assert!(after_one > before);
        assert!(after_two > after_one);
    }

    #[test]
    fn write_discards_previous_content() {
        let (handle, control) = mock();
        control.set_items(vec![
            MockItem::image(FormatTag::Png, PNG_BYTES.to_vec()),
            MockItem::file("/tmp/a.txt"),
        ]);
        handle.write("replaced").unwrap();

        let info = handle.query_information().unwrap();
        assert_eq!(info, ClipboardInformation::with_format(FormatTag::Utf8Text, 1));
        let (data, _) = handle.read(&ClipboardTypeFilter::image_only()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn png_preferred_over_jpeg() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::new()
            .with_type(UTI_JPEG, JPEG_BYTES.to_vec())
            .with_type(UTI_PNG, PNG_BYTES.to_vec())]);

        let (data, info) = handle.read(&ClipboardTypeFilter::image_only()).unwrap();
        assert_eq!(info.format, FormatTag::Png);
        assert_eq!(data.as_bytes(), PNG_BYTES);
    }

    #[test]
    fn image_bytes_are_passed_through() {
        let (handle, control) = mock();
        let bmp = vec![b'B', b'M', 1, 2, 3, 4];
        control.set_items(vec![MockItem::new().with_type(UTI_BMP, bmp.clone())]);

        let (data, info) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert_eq!(info, ClipboardInformation::with_format(FormatTag::Bmp, 1));
        assert_eq!(data.into_bytes(), bmp);
    }

    #[test]
    fn filter_skips_text_and_falls_through_to_image() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::text("caption")
            .with_type(UTI_PNG, PNG_BYTES.to_vec())]);

        let (data, info) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert_eq!(info.content_type, ContentType::Text);
        assert_eq!(data.as_text(), Some("caption"));

        let (data, info) = handle.read(&ClipboardTypeFilter::image_only()).unwrap();
        assert_eq!(info.format, FormatTag::Png);
        assert_eq!(data.as_bytes(), PNG_BYTES);
    }

    #[test]
    fn filter_matching_nothing_is_empty() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::text("only text")]);
        let (data, info) = handle.read(&ClipboardTypeFilter::image_only()).unwrap();
        assert!(data.is_empty());
        assert_eq!(info.content_type, ContentType::None);
        assert_eq!(info.item_count, 1);
    }

    #[test]
    fn files_are_nul_delimited_paths() {
        let (handle, control) = mock();
        control.set_items(vec![
            MockItem::file("/Users/me/a.txt"),
            MockItem::file("/Users/me/b.png"),
        ]);

        let info = handle.query_information().unwrap();
        assert_eq!(info, ClipboardInformation::files(2));

        let (data, info) = handle.read(&ClipboardTypeFilter::files_only()).unwrap();
        assert_eq!(info.content_type, ContentType::Files);
        assert_eq!(info.format, FormatTag::None);
        assert_eq!(info.item_count, 2);
        assert_eq!(data.file_paths(), vec!["/Users/me/a.txt", "/Users/me/b.png"]);
        assert_eq!(data.as_bytes(), b"/Users/me/a.txt\0/Users/me/b.png");
    }

    #[test]
    fn path_with_newline_survives() {
        let (handle, control) = mock();
        control.set_items(vec![
            MockItem::file("/tmp/odd\nname.txt"),
            MockItem::file("/tmp/plain.txt"),
        ]);

        let (data, _) = handle.read(&ClipboardTypeFilter::files_only()).unwrap();
        assert_eq!(data.file_paths(), vec!["/tmp/odd\nname.txt", "/tmp/plain.txt"]);
    }

    #[test]
    fn declared_file_url_reads_as_files() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::new().with_type(UTI_FILE_URL, b"file:///x".to_vec())]);

        let queried = handle.query_information().unwrap();
        assert_eq!(queried, ClipboardInformation::files(1));

        let (data, read) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert_eq!(read, queried);
        assert_eq!(data.file_paths(), vec!["/x"]);
    }

    #[test]
    fn unknown_types_classify_as_other() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::new().with_type("com.adobe.pdf", vec![b'%', b'P'])]);

        let info = handle.query_information().unwrap();
        assert_eq!(info, ClipboardInformation::other(1));

        let (data, info) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert!(data.is_empty());
        assert_eq!(info.content_type, ContentType::None);
    }

    #[test]
    fn query_and_read_agree() {
        let (handle, control) = mock();
        control.set_items(vec![
            MockItem::new()
                .with_type(UTI_JPEG, JPEG_BYTES.to_vec())
                .with_type(UTI_FILE_URL, b"file:///tmp/x.jpg".to_vec()),
            MockItem::text("second"),
        ]);

        let queried = handle.query_information().unwrap();
        let (_, read) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert_eq!(queried, read);
        assert_eq!(queried.format, FormatTag::Jpeg);
        assert_eq!(queried.item_count, 2);
    }

    #[test]
    fn query_is_idempotent() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::image(FormatTag::Tiff, vec![0x49, 0x49, 0x2A, 0x00])]);
        let first = handle.query_information().unwrap();
        let second = handle.query_information().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn declared_type_without_data_falls_through() {
        let (handle, control) = mock();
        control.set_items(vec![MockItem::new()
            .with_promised_type(UTI_PNG)
            .with_type(UTI_JPEG, JPEG_BYTES.to_vec())]);

        let (data, info) = handle.read(&ClipboardTypeFilter::image_only()).unwrap();
        assert_eq!(info.format, FormatTag::Jpeg);
        assert_eq!(data.as_bytes(), JPEG_BYTES);
    }

    #[test]
    fn declared_types_and_raw_reads() {
        let (handle, control) = mock();
        assert!(handle.declared_types().unwrap().is_empty());
        assert!(handle.read_raw(UTI_UTF8_TEXT).unwrap().is_none());

        control.set_items(vec![MockItem::text("hi").with_type("public.rtf", b"{\\rtf1 hi}".to_vec())]);
        assert_eq!(
            handle.declared_types().unwrap(),
            vec![UTI_UTF8_TEXT.to_string(), "public.rtf".to_string()]
        );
        let rtf = handle.read_raw("public.rtf").unwrap().unwrap();
        assert_eq!(rtf.as_text(), Some("{\\rtf1 hi}"));
        assert!(handle.read_raw(UTI_PNG).unwrap().is_none());
    }

    #[test]
    fn unavailable_backend_surfaces_error() {
        let (handle, control) = mock();
        control.set_unavailable(Some("no display session"));
        let err = handle.read(&ClipboardTypeFilter::all()).unwrap_err();
        assert!(err.is_unavailable());
        assert!(handle.change_count().unwrap_err().is_unavailable());
    }

    #[test]
    fn rejected_write_surfaces_error() {
        let (handle, control) = mock();
        control.set_reject_writes(true);
        let before = handle.change_count().unwrap();
        let err = handle.write("denied").unwrap_err();
        assert!(matches!(err, ClipboardError::WriteRejected(_)));
        assert_eq!(handle.change_count().unwrap(), before);
    }

    #[test]
    fn non_default_board_is_rejected() {
        let err = open_board(Board::PrimarySelection).unwrap_err();
        assert!(matches!(err, ClipboardError::NoBoard(Board::PrimarySelection)));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn system_pasteboard_unavailable_off_macos() {
        let err = open_handle().unwrap_err();
        assert!(err.is_unavailable());
    }

    /// Backend that lets another "application" replace the clipboard while
    /// an operation is between backend calls.
    struct ChangesMidCall {
        inner: MockPasteboard,
        control: MockPasteboardHandle,
        interruptions: AtomicUsize,
        replacement: Vec<MockItem>,
    }

    impl ChangesMidCall {
        fn new(items: Vec<MockItem>, replacement: Vec<MockItem>, interruptions: usize) -> Self {
            let inner = MockPasteboard::new();
            let control = inner.handle();
            control.set_items(items);
            Self {
                inner,
                control,
                interruptions: AtomicUsize::new(interruptions),
                replacement,
            }
        }
    }

    impl PasteboardBackend for ChangesMidCall {
        fn change_count(&self) -> Result<i64, ClipboardError> {
            self.inner.change_count()
        }

        fn item_count(&self) -> Result<usize, ClipboardError> {
            let count = self.inner.item_count()?;
            let left = self.interruptions.load(Ordering::SeqCst);
            if left > 0 {
                self.interruptions.store(left - 1, Ordering::SeqCst);
                self.control.set_items(self.replacement.clone());
            }
            Ok(count)
        }

        fn item_types(&self, index: usize) -> Result<Vec<String>, ClipboardError> {
            self.inner.item_types(index)
        }

        fn item_data(
            &self,
            index: usize,
            declared_type: &str,
        ) -> Result<Option<Vec<u8>>, ClipboardError> {
            self.inner.item_data(index, declared_type)
        }

        fn file_paths(&self) -> Result<Vec<String>, ClipboardError> {
            self.inner.file_paths()
        }

        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.inner.write_text(text)
        }
    }

    fn two_images() -> Vec<MockItem> {
        vec![
            MockItem::image(FormatTag::Png, PNG_BYTES.to_vec()),
            MockItem::image(FormatTag::Jpeg, JPEG_BYTES.to_vec()),
        ]
    }

    #[test]
    fn query_never_mixes_states_when_cleared_mid_call() {
        let backend = ChangesMidCall::new(two_images(), Vec::new(), 1);
        let handle = ClipboardHandle::with_backend(Arc::new(backend));

        let info = handle.query_information().unwrap();
        assert_eq!(info, ClipboardInformation::empty(0));
    }

    #[test]
    fn read_never_mixes_states_when_replaced_mid_call() {
        let backend = ChangesMidCall::new(two_images(), vec![MockItem::text("newer")], 1);
        let handle = ClipboardHandle::with_backend(Arc::new(backend));

        let (data, info) = handle.read(&ClipboardTypeFilter::all()).unwrap();
        assert_eq!(info, ClipboardInformation::with_format(FormatTag::Utf8Text, 1));
        assert_eq!(data.as_text(), Some("newer"));
    }

    #[test]
    fn raw_reads_retry_after_change() {
        let backend = ChangesMidCall::new(two_images(), vec![MockItem::text("newer")], 2);
        let handle = ClipboardHandle::with_backend(Arc::new(backend));

        assert_eq!(handle.declared_types().unwrap(), vec![UTI_UTF8_TEXT.to_string()]);
        assert!(handle.read_raw(UTI_PNG).unwrap().is_none());
    }

    #[test]
    fn clipboard_that_never_settles_is_unavailable() {
        let backend = ChangesMidCall::new(two_images(), two_images(), usize::MAX);
        let handle = ClipboardHandle::with_backend(Arc::new(backend));

        let err = handle.read(&ClipboardTypeFilter::all()).unwrap_err();
        assert!(err.is_unavailable());
        assert!(handle.query_information().unwrap_err().is_unavailable());
    }
}
