use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Normalize text to Unicode canonical composed form (NFC).
///
/// Some platforms store file names decomposed (NFD) while text inputs are
/// composed. Working in NFC everywhere keeps regex quantifiers intuitive:
/// `é{3}` matches `ééé` rather than `e` followed by three combining accents.
pub fn normalize(text: &str) -> String {
    match is_nfc_quick(text.chars()) {
        IsNormalized::Yes => text.to_string(),
        _ => text.nfc().collect(),
    }
}

/// Normalize a picked path: NFC, without trailing separators so the last
/// component is the entry's own name. A root (`/`, `C:\`) is kept as is.
pub fn normalize_path(path: &str) -> String {
    let path = normalize(path);
    let trimmed = path.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() || trimmed.ends_with(':') || trimmed.len() == path.len() {
        path
    } else {
        trimmed.to_string()
    }
}

pub fn normalize_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    paths.iter().map(|p| normalize_path(p.as_ref())).collect()
}
