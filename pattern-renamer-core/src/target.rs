use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which part of a path the pattern substitution is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameTarget {
    /// The entire path string
    Full,
    /// The final path component
    #[default]
    Name,
    /// The final path component without its extension
    Stem,
}

impl RenameTarget {
    pub const ALL: [Self; 3] = [Self::Full, Self::Name, Self::Stem];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Name => "name",
            Self::Stem => "stem",
        }
    }

    /// Split `path` into the untouched prefix, the slice the pattern applies to,
    /// and the untouched suffix. Concatenating the three yields `path` again.
    pub fn split(self, path: &str) -> (&str, &str, &str) {
        match self {
            Self::Full => ("", path, ""),
            Self::Name => split_name(path),
            Self::Stem => {
                let (parent, name, _) = split_name(path);
                let (stem, _) = split_extension(name);
                (parent, stem, &path[parent.len() + stem.len()..])
            },
        }
    }

    /// Returns the displayed slice of `path` for this target, e.g. for a
    /// side-by-side preview
    pub fn slice(self, path: &str) -> &str {
        self.split(path).1
    }
}

impl fmt::Display for RenameTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenameTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "name" => Ok(Self::Name),
            "stem" => Ok(Self::Stem),
            _ => Err(format!("Invalid rename target: {}", s)),
        }
    }
}

/// Split a path into its parent prefix (separator included), final component
/// and any trailing separators. Works on the raw string so the prefix is kept
/// byte for byte.
fn split_name(path: &str) -> (&str, &str, &str) {
    let trimmed = path.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() {
        return (path, "", "");
    }
    let trailing = &path[trimmed.len()..];
    match trimmed.rfind(std::path::is_separator) {
        Some(index) => {
            let (parent, name) = trimmed.split_at(index + 1);
            (parent, name, trailing)
        },
        None => ("", trimmed, trailing),
    }
}

/// Split a file name into stem and extension (dot included).
/// A dot in first or last position does not start an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 && index < name.len() - 1 => name.split_at(index),
        _ => (name, ""),
    }
}
