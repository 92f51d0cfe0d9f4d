//! Clipboard classification and payload types.

use serde::{Deserialize, Serialize};

use crate::error::TagError;

/// Broad kind of the first clipboard item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Nothing on the clipboard, or nothing matched the read filter.
    #[default]
    None = 0,
    /// UTF-8 text.
    Text = 1,
    /// Encoded image data.
    Image = 2,
    /// A list of file references.
    Files = 3,
    /// Content is present but of a kind this crate does not classify.
    Other = 4,
}

impl ContentType {
    /// Stable numeric tag.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text => "text",
            Self::Image => "image",
            Self::Files => "files",
            Self::Other => "other",
        }
    }
}

impl TryFrom<u8> for ContentType {
    type Error = TagError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Text),
            2 => Ok(Self::Image),
            3 => Ok(Self::Files),
            4 => Ok(Self::Other),
            other => Err(TagError::ContentType(other)),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Transfer format of a clipboard payload.
///
/// The numeric tags are part of the external contract and must not change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    #[default]
    None = 0,
    Utf8Text = 1,
    Png = 2,
    Bmp = 3,
    Tiff = 4,
    Jpeg = 5,
}

impl FormatTag {
    /// Stable numeric tag.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Content kind this format belongs to.
    #[must_use]
    pub fn content_type(self) -> ContentType {
        match self {
            Self::None => ContentType::None,
            Self::Utf8Text => ContentType::Text,
            Self::Png | Self::Bmp | Self::Tiff | Self::Jpeg => ContentType::Image,
        }
    }

    /// Whether this is one of the image formats.
    #[must_use]
    pub fn is_image(self) -> bool {
        self.content_type() == ContentType::Image
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Utf8Text => "utf8-text",
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Jpeg => "jpeg",
        }
    }
}

impl TryFrom<u8> for FormatTag {
    type Error = TagError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Utf8Text),
            2 => Ok(Self::Png),
            3 => Ok(Self::Bmp),
            4 => Ok(Self::Tiff),
            5 => Ok(Self::Jpeg),
            other => Err(TagError::Format(other)),
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata about the current clipboard item.
///
/// `format` is [`FormatTag::None`] unless `content_type` is text or image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardInformation {
    pub content_type: ContentType,
    pub format: FormatTag,
    pub item_count: usize,
}

impl ClipboardInformation {
    /// Record for an empty clipboard, or a read that matched nothing.
    #[must_use]
    pub fn empty(item_count: usize) -> Self {
        Self {
            content_type: ContentType::None,
            format: FormatTag::None,
            item_count,
        }
    }

    /// Record for a classified item carrying a concrete format.
    #[must_use]
    pub fn with_format(format: FormatTag, item_count: usize) -> Self {
        Self {
            content_type: format.content_type(),
            format,
            item_count,
        }
    }

    /// Record for a file-list item. File lists carry no format tag.
    #[must_use]
    pub fn files(item_count: usize) -> Self {
        Self {
            content_type: ContentType::Files,
            format: FormatTag::None,
            item_count,
        }
    }

    /// Record for content that matched no known declared type.
    #[must_use]
    pub fn other(item_count: usize) -> Self {
        Self {
            content_type: ContentType::Other,
            format: FormatTag::None,
            item_count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_type == ContentType::None
    }
}

impl std::fmt::Display for ClipboardInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} #{}), {} item(s)",
            self.content_type,
            self.format,
            self.format.tag(),
            self.item_count
        )
    }
}

/// Raw payload extracted from the clipboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardData {
    bytes: Vec<u8>,
}

impl ClipboardData {
    /// Wrap an owned byte buffer.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Empty payload.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Text payload, UTF-8 encoded.
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self {
            bytes: s.as_bytes().to_vec(),
        }
    }

    /// NUL-delimited file path list. NUL cannot occur in a path, so any
    /// path (including one containing a newline) survives the round trip.
    #[must_use]
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let joined = paths
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\0");
        Self {
            bytes: joined.into_bytes(),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Try to interpret the payload as UTF-8 text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Split a file-list payload into individual paths.
    #[must_use]
    pub fn file_paths(&self) -> Vec<&str> {
        match self.as_text() {
            Some(s) if !s.is_empty() => s.split('\0').collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Vec<u8>> for ClipboardData {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
