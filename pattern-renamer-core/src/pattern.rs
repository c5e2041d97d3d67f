use regex::Regex;
use thiserror::Error;

/// Why a replacement pattern was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplacePatternError {
    #[error("unterminated group reference starting at byte {0}")]
    Unterminated(usize),
    #[error("empty group reference at byte {0}")]
    EmptyReference(usize),
    #[error("invalid group reference ${{{0}}}: the pattern has no group {0}")]
    UnknownGroupIndex(String),
    #[error("unknown group name ${{{0}}}")]
    UnknownGroupName(String),
}

/// Compile a regular expression the way the engine uses it
pub fn compile_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

/// A replacement template validated against a compiled regex.
///
/// Uses the regex crate's native syntax: `$1`, `${1}`, `$name`, `${name}`
/// and `$$` for a literal dollar sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacePattern {
    template: String,
}

/// One `$` reference found in a template
#[derive(Debug, PartialEq, Eq)]
enum GroupRef<'a> {
    Index(usize),
    Name(&'a str),
}

impl ReplacePattern {
    /// Validate `template` against `regex`.
    ///
    /// Rejects references to groups the regex does not define instead of
    /// silently substituting an empty string, so `$1a` (the group named
    /// "1a") and typos like `$nmae` surface as mistakes.
    pub fn parse(template: &str, regex: &Regex) -> Result<Self, ReplacePatternError> {
        for (position, reference) in scan_references(template)? {
            match reference {
                GroupRef::Index(index) => {
                    if index >= regex.captures_len() {
                        return Err(ReplacePatternError::UnknownGroupIndex(index.to_string()));
                    }
                },
                GroupRef::Name(name) => {
                    if !regex.capture_names().flatten().any(|n| n == name) {
                        // Digits too large for usize land here as names
                        if name.bytes().all(|b| b.is_ascii_digit()) {
                            return Err(ReplacePatternError::UnknownGroupIndex(name.to_string()));
                        }
                        tracing::debug!(position, name, "unknown group name in replacement");
                        return Err(ReplacePatternError::UnknownGroupName(name.to_string()));
                    }
                },
            }
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    /// Replace every non-overlapping match of `regex` in `text`
    pub fn substitute(&self, regex: &Regex, text: &str) -> String {
        regex.replace_all(text, self.template.as_str()).into_owned()
    }
}

/// Walk the template and collect group references with their byte offsets,
/// mirroring how the regex crate expands replacements.
fn scan_references(template: &str) -> Result<Vec<(usize, GroupRef<'_>)>, ReplacePatternError> {
    let bytes = template.as_bytes();
    let mut references = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        let start = i;
        match bytes.get(i + 1) {
            Some(b'$') => {
                i += 2;
            },
            Some(b'{') => {
                let Some(close) = template[i + 2..].find('}') else {
                    return Err(ReplacePatternError::Unterminated(start));
                };
                let name = &template[i + 2..i + 2 + close];
                if name.is_empty() {
                    return Err(ReplacePatternError::EmptyReference(start));
                }
                references.push((start, classify(name)));
                i += close + 3;
            },
            _ => {
                let name_len = bytes[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                    .count();
                if name_len > 0 {
                    references.push((start, classify(&template[i + 1..i + 1 + name_len])));
                }
                // A lone `$` is literal
                i += 1 + name_len;
            },
        }
    }

    Ok(references)
}

fn classify(name: &str) -> GroupRef<'_> {
    match name.parse::<usize>() {
        Ok(index) => GroupRef::Index(index),
        Err(_) => GroupRef::Name(name),
    }
}
