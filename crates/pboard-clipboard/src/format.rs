//! Declared-type to format-tag resolution.
//!
//! A pasteboard item advertises one or more declared type identifiers. The
//! first entry of [`FORMAT_PRIORITY`] that the item declares, and that the
//! read filter enables, decides how the item is classified and which bytes
//! are transferred.

use pboard_types::{ClipboardInformation, ClipboardTypeFilter, ContentType, FormatTag};

pub const UTI_UTF8_TEXT: &str = "public.utf8-plain-text";
pub const UTI_PNG: &str = "public.png";
pub const UTI_JPEG: &str = "public.jpeg";
pub const UTI_TIFF: &str = "public.tiff";
pub const UTI_BMP: &str = "com.microsoft.bmp";
pub const UTI_FILE_URL: &str = "public.file-url";

/// One entry of the resolution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRule {
    pub declared_type: &'static str,
    pub content_type: ContentType,
    pub format: FormatTag,
}

impl FormatRule {
    const fn new(declared_type: &'static str, content_type: ContentType, format: FormatTag) -> Self {
        Self {
            declared_type,
            content_type,
            format,
        }
    }

    /// Classification record for an item resolved by this rule.
    pub fn information(&self, item_count: usize) -> ClipboardInformation {
        ClipboardInformation {
            content_type: self.content_type,
            format: self.format,
            item_count,
        }
    }
}

/// Resolution order: text, then images (PNG, JPEG, TIFF, BMP), then files.
pub const FORMAT_PRIORITY: &[FormatRule] = &[
    FormatRule::new(UTI_UTF8_TEXT, ContentType::Text, FormatTag::Utf8Text),
    FormatRule::new(UTI_PNG, ContentType::Image, FormatTag::Png),
    FormatRule::new(UTI_JPEG, ContentType::Image, FormatTag::Jpeg),
    FormatRule::new(UTI_TIFF, ContentType::Image, FormatTag::Tiff),
    FormatRule::new(UTI_BMP, ContentType::Image, FormatTag::Bmp),
    FormatRule::new(UTI_FILE_URL, ContentType::Files, FormatTag::None),
];

/// Rules matching `declared`, restricted to `filter`, in priority order.
pub fn candidates<'a, S: AsRef<str>>(
    declared: &'a [S],
    filter: &'a ClipboardTypeFilter,
) -> impl Iterator<Item = &'static FormatRule> + 'a {
    FORMAT_PRIORITY.iter().filter(move |rule| {
        filter.allows(rule.content_type)
            && declared.iter().any(|d| d.as_ref() == rule.declared_type)
    })
}

/// Highest-priority rule matching `declared` under `filter`.
pub fn select<S: AsRef<str>>(
    declared: &[S],
    filter: &ClipboardTypeFilter,
) -> Option<&'static FormatRule> {
    candidates(declared, filter).next()
}

/// Rule for a format tag, if the tag has a declared type.
pub fn rule_for(format: FormatTag) -> Option<&'static FormatRule> {
    FORMAT_PRIORITY
        .iter()
        .find(|rule| rule.format == format && format != FormatTag::None)
}
