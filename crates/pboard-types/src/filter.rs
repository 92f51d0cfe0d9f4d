//! Read filter.

use serde::{Deserialize, Serialize};

use crate::clipboard::ContentType;

/// Which content kinds a read should consider.
///
/// An all-false filter is valid and yields an empty result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardTypeFilter {
    pub text: bool,
    pub image: bool,
    pub files: bool,
}

impl ClipboardTypeFilter {
    /// Consider every kind.
    #[must_use]
    pub fn all() -> Self {
        Self {
            text: true,
            image: true,
            files: true,
        }
    }

    /// Consider nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text_only() -> Self {
        Self {
            text: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn image_only() -> Self {
        Self {
            image: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn files_only() -> Self {
        Self {
            files: true,
            ..Self::default()
        }
    }

    /// Whether no kind is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.text || self.image || self.files)
    }

    /// Whether the given kind is enabled. `None` and `Other` are never
    /// selectable.
    #[must_use]
    pub fn allows(&self, kind: ContentType) -> bool {
        match kind {
            ContentType::Text => self.text,
            ContentType::Image => self.image,
            ContentType::Files => self.files,
            ContentType::None | ContentType::Other => false,
        }
    }
}
