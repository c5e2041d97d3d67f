use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a single path component, in bytes
const MAX_COMPONENT_LEN: usize = 255;

const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const WINDOWS_INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Platform whose path rules a destination is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

impl Platform {
    /// The platform this binary runs on
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }

    /// Maximum total path length. Bytes on Unix, UTF-16 units on Windows.
    pub fn max_path_len(self) -> usize {
        match self {
            Self::Linux => 4096,
            Self::Macos => 1024,
            Self::Windows => 260,
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            Self::Windows => c == '/' || c == '\\',
            Self::Linux | Self::Macos => c == '/',
        }
    }

    /// Check that `path` is syntactically valid as a file path on this platform.
    /// Returns a description of the first violated rule.
    pub fn validate_path(self, path: &str) -> Result<(), String> {
        if path.is_empty() {
            return Err("path is empty".to_string());
        }
        if path.contains('\0') {
            return Err("path contains a NUL character".to_string());
        }

        let length = match self {
            Self::Windows => path.encode_utf16().count(),
            Self::Linux | Self::Macos => path.len(),
        };
        if length > self.max_path_len() {
            return Err(format!(
                "path is {} long, the limit is {}",
                length,
                self.max_path_len()
            ));
        }

        if path.ends_with(|c| self.is_separator(c)) {
            return Err("file name is empty".to_string());
        }

        let body = match self {
            Self::Windows => strip_windows_prefix(path),
            Self::Linux | Self::Macos => path,
        };

        for component in body.split(|c| self.is_separator(c)) {
            if component.is_empty() || component == "." || component == ".." {
                continue;
            }
            self.validate_component(component)?;
        }

        Ok(())
    }

    fn validate_component(self, component: &str) -> Result<(), String> {
        if component.len() > MAX_COMPONENT_LEN {
            return Err(format!(
                "'{}…' is longer than {} bytes",
                component.chars().take(16).collect::<String>(),
                MAX_COMPONENT_LEN
            ));
        }

        match self {
            Self::Linux => {},
            Self::Macos => {
                if component.contains(':') {
                    return Err(format!("'{}' contains ':'", component));
                }
            },
            Self::Windows => {
                if let Some(c) = component
                    .chars()
                    .find(|c| WINDOWS_INVALID_CHARS.contains(c) || c.is_ascii_control())
                {
                    return Err(format!("'{}' contains invalid character {:?}", component, c));
                }
                if component.ends_with(' ') || component.ends_with('.') {
                    return Err(format!("'{}' ends with a space or a dot", component));
                }
                let base = component.split('.').next().unwrap_or(component).trim_end();
                if WINDOWS_RESERVED_NAMES
                    .iter()
                    .any(|reserved| reserved.eq_ignore_ascii_case(base))
                {
                    return Err(format!("'{}' is a reserved name", component));
                }
            },
        }

        Ok(())
    }
}

/// Drop a `\\?\` or `\\.\` device prefix and a `C:` drive so its colon is
/// not checked as a component character.
fn strip_windows_prefix(path: &str) -> &str {
    let path = path
        .strip_prefix(r"\\?\")
        .or_else(|| path.strip_prefix(r"\\.\"))
        .unwrap_or(path);
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        &path[2..]
    } else {
        path
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        })
    }
}
