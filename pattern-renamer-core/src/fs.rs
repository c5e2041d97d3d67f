use std::fs;
use std::io;
use std::path::Path;

/// The filesystem primitives the engine needs. The real implementation is
/// [`OsFileSystem`]; tests substitute their own to inject failures.
pub trait FileSystem {
    /// Whether any entry (file, directory, dangling symlink) exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `a` and `b` name the same filesystem entry, e.g. two spellings
    /// of one file on a case-insensitive filesystem
    fn same_entry(&self, a: &Path, b: &Path) -> bool;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn same_entry(&self, a: &Path, b: &Path) -> bool {
        same_entry(a, b)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    // Without inode numbers, fall back to comparing canonical paths; on a
    // case-insensitive volume both spellings resolve to the stored name.
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether `from` and `to` differ only by letter case
pub fn is_case_only_change(from: &str, to: &str) -> bool {
    from != to && from.to_lowercase() == to.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exists_and_same_entry() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        let other = temp_dir.path().join("b.txt");
        fs::write(&other, "b").unwrap();

        let fs = OsFileSystem;
        assert!(fs.exists(&file));
        assert!(!fs.exists(&temp_dir.path().join("missing")));
        assert!(fs.same_entry(&file, &file));
        assert!(!fs.same_entry(&file, &other));
        assert!(!fs.same_entry(&file, &temp_dir.path().join("missing")));
    }

    #[test]
    fn test_rename() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("from.txt");
        let to = temp_dir.path().join("to.txt");
        fs::write(&from, "content").unwrap();

        OsFileSystem.rename(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
    }

    #[test]
    fn test_case_only_change() {
        assert!(is_case_only_change("/tmp/A.txt", "/tmp/a.txt"));
        assert!(!is_case_only_change("/tmp/a.txt", "/tmp/a.txt"));
        assert!(!is_case_only_change("/tmp/a.txt", "/tmp/b.txt"));
    }
}
