//! Clipboard selection boards.

use serde::{Deserialize, Serialize};

/// A clipboard selection.
///
/// Every platform has [`Board::Default`]. X11 systems also expose the primary
/// and secondary selections; the macOS pasteboard does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    #[default]
    Default,
    PrimarySelection,
    SecondarySelection,
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::PrimarySelection => write!(f, "Primary Selection"),
            Self::SecondarySelection => write!(f, "Secondary Selection"),
        }
    }
}
