use serde::{Deserialize, Serialize};
use std::fmt;

/// A detected reason the current rename configuration cannot be safely applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mistake {
    /// The regular expression does not compile
    InvalidRegex { detail: String },
    /// The replacement pattern references groups the regex does not define,
    /// or is malformed
    InvalidReplacePattern { detail: String },
    /// Another entry renames to the same destination
    Duplicate { index: usize },
    /// Something already exists at the destination
    Exists { index: usize },
    /// The destination is not a valid path on the platform
    InvalidDestination { index: usize, detail: String },
}

impl Mistake {
    /// Index of the culprit entry for destination mistakes
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Duplicate { index }
            | Self::Exists { index }
            | Self::InvalidDestination { index, .. } => Some(*index),
            Self::InvalidRegex { .. } | Self::InvalidReplacePattern { .. } => None,
        }
    }

    pub fn is_destination(&self) -> bool {
        self.index().is_some()
    }

    /// Short tag used in tables and JSON
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRegex { .. } => "invalid_regex",
            Self::InvalidReplacePattern { .. } => "invalid_replace_pattern",
            Self::Duplicate { .. } => "duplicate",
            Self::Exists { .. } => "exists",
            Self::InvalidDestination { .. } => "invalid_destination",
        }
    }

    /// User-facing explanation without the entry index
    pub fn message(&self) -> String {
        match self {
            Self::InvalidRegex { detail } => format!("Invalid regular expression: {}", detail),
            Self::InvalidReplacePattern { detail } => {
                format!("Invalid replace pattern: {}", detail)
            },
            Self::Duplicate { .. } => "Multiple files would be renamed to this path".to_string(),
            Self::Exists { .. } => "A file already exists at this path".to_string(),
            Self::InvalidDestination { detail, .. } => {
                format!("Destination is not a valid path: {}", detail)
            },
        }
    }
}

impl fmt::Display for Mistake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "#{}: {}", index, self.message()),
            None => f.write_str(&self.message()),
        }
    }
}
