//! The rename computation: from picked paths, a regex, a replacement pattern
//! and a target, derive the renamed paths and everything that makes them
//! unsafe to apply.

use crate::fs::{FileSystem, OsFileSystem};
use crate::mistake::Mistake;
use crate::normalize::{normalize, normalize_paths};
use crate::pattern::{compile_regex, ReplacePattern};
use crate::platform::Platform;
use crate::target::RenameTarget;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// The user-controlled inputs of a rename. Constructors normalize every text
/// to NFC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenameInput {
    pub picked_paths: Vec<String>,
    pub regex: String,
    pub replace_pattern: String,
    pub target: RenameTarget,
}

impl RenameInput {
    pub fn new<S: AsRef<str>>(
        picked_paths: &[S],
        regex: &str,
        replace_pattern: &str,
        target: RenameTarget,
    ) -> Self {
        Self {
            picked_paths: normalize_paths(picked_paths),
            regex: normalize(regex),
            replace_pattern: normalize(replace_pattern),
            target,
        }
    }
}

/// A picked path paired with its destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub index: usize,
    pub picked: String,
    pub renamed: String,
}

impl PathEntry {
    pub fn is_changed(&self) -> bool {
        self.picked != self.renamed
    }
}

/// Everything derived from a [`RenameInput`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preview {
    pub picked_paths: Vec<String>,
    /// Same length and order as `picked_paths`, or empty when the replace
    /// pattern is invalid
    pub renamed_paths: Vec<String>,
    pub mistakes: Vec<Mistake>,
    pub can_apply: bool,
}

impl Preview {
    /// All entries, paired by index
    pub fn entries(&self) -> Vec<PathEntry> {
        self.picked_paths
            .iter()
            .zip(&self.renamed_paths)
            .enumerate()
            .map(|(index, (picked, renamed))| PathEntry {
                index,
                picked: picked.clone(),
                renamed: renamed.clone(),
            })
            .collect()
    }

    /// Entries whose destination differs from their source
    pub fn changes(&self) -> Vec<PathEntry> {
        self.entries()
            .into_iter()
            .filter(PathEntry::is_changed)
            .collect()
    }

    /// Destination mistakes attached to entry `index`
    pub fn mistakes_for(&self, index: usize) -> impl Iterator<Item = &Mistake> {
        self.mistakes
            .iter()
            .filter(move |m| m.index() == Some(index))
    }
}

/// Computes previews against a platform's path rules and a filesystem
#[derive(Debug, Clone)]
pub struct RenameEngine<F = OsFileSystem> {
    platform: Platform,
    fs: F,
}

impl RenameEngine<OsFileSystem> {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            fs: OsFileSystem,
        }
    }
}

impl Default for RenameEngine<OsFileSystem> {
    fn default() -> Self {
        Self::new(Platform::host())
    }
}

impl<F: FileSystem> RenameEngine<F> {
    pub fn with_fs(platform: Platform, fs: F) -> Self {
        Self { platform, fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Compute renamed paths and mistakes. Deterministic for a given input
    /// and filesystem state.
    pub fn compute(&self, input: &RenameInput) -> Preview {
        let picked_paths = input.picked_paths.clone();
        let mut mistakes = Vec::new();

        let regex = if input.regex.is_empty() {
            None
        } else {
            match compile_regex(&input.regex) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::debug!(regex = %input.regex, "regex does not compile");
                    mistakes.push(Mistake::InvalidRegex {
                        detail: e.to_string(),
                    });
                    None
                },
            }
        };

        let renamed_paths = match regex {
            Some(regex) if !input.replace_pattern.is_empty() => {
                match ReplacePattern::parse(&input.replace_pattern, &regex) {
                    Ok(replace) => {
                        let renamed: Vec<String> = picked_paths
                            .iter()
                            .map(|path| {
                                let (prefix, slice, suffix) = input.target.split(path);
                                let mut out = String::with_capacity(path.len());
                                out.push_str(prefix);
                                out.push_str(&replace.substitute(&regex, slice));
                                out.push_str(suffix);
                                out
                            })
                            .collect();
                        mistakes.extend(self.detect_destination_mistakes(&picked_paths, &renamed));
                        renamed
                    },
                    Err(e) => {
                        mistakes.push(Mistake::InvalidReplacePattern {
                            detail: e.to_string(),
                        });
                        Vec::new()
                    },
                }
            },
            // Nothing to substitute: show the paths unchanged
            _ => picked_paths.clone(),
        };

        let can_apply = !input.regex.is_empty()
            && !input.replace_pattern.is_empty()
            && !picked_paths.is_empty()
            && picked_paths.len() == renamed_paths.len()
            && picked_paths.iter().zip(&renamed_paths).any(|(p, r)| p != r)
            && mistakes.is_empty();

        tracing::debug!(
            paths = picked_paths.len(),
            mistakes = mistakes.len(),
            can_apply,
            "computed rename preview"
        );

        Preview {
            picked_paths,
            renamed_paths,
            mistakes,
            can_apply,
        }
    }

    fn detect_destination_mistakes(&self, picked: &[String], renamed: &[String]) -> Vec<Mistake> {
        let mut mistakes = Vec::new();
        let mut buckets: HashMap<&str, Vec<usize>> = HashMap::new();

        for (index, (picked_path, renamed_path)) in picked.iter().zip(renamed).enumerate() {
            let bucket = buckets.entry(renamed_path.as_str()).or_default();
            if let Some(&first) = bucket.first() {
                // The first repeat also flags the original
                if bucket.len() == 1 {
                    mistakes.push(Mistake::Duplicate { index: first });
                }
                mistakes.push(Mistake::Duplicate { index });
            }
            bucket.push(index);

            if let Err(detail) = self.platform.validate_path(renamed_path) {
                mistakes.push(Mistake::InvalidDestination { index, detail });
            }

            if renamed_path != picked_path {
                let destination = Path::new(renamed_path);
                if self.fs.exists(destination)
                    && !self.fs.same_entry(Path::new(picked_path), destination)
                {
                    mistakes.push(Mistake::Exists { index });
                }
            }
        }

        mistakes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::io;

    /// In-memory filesystem listing which paths exist
    #[derive(Default)]
    struct FakeFs {
        existing: RefCell<HashSet<String>>,
    }

    impl FakeFs {
        fn with(paths: &[&str]) -> Self {
            Self {
                existing: RefCell::new(paths.iter().map(|p| (*p).to_string()).collect()),
            }
        }
    }

    impl FileSystem for FakeFs {
        fn exists(&self, path: &Path) -> bool {
            self.existing
                .borrow()
                .contains(path.to_str().unwrap_or_default())
        }

        fn same_entry(&self, a: &Path, b: &Path) -> bool {
            a == b
        }

        fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    fn engine(existing: &[&str]) -> RenameEngine<FakeFs> {
        RenameEngine::with_fs(Platform::Linux, FakeFs::with(existing))
    }

    fn input(paths: &[&str], regex: &str, replace: &str, target: RenameTarget) -> RenameInput {
        RenameInput::new(paths, regex, replace, target)
    }

    #[test]
    fn test_full_target_scenario() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a.txt", "/tmp/b.txt"],
            r"(.*)\.txt",
            "$1.bak",
            RenameTarget::Full,
        ));
        assert_eq!(preview.renamed_paths, vec!["/tmp/a.bak", "/tmp/b.bak"]);
        assert!(preview.mistakes.is_empty());
        assert!(preview.can_apply);
    }

    #[test]
    fn test_directory_with_trailing_separator_renames_its_name() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/somedir/"],
            "^",
            "x",
            RenameTarget::Name,
        ));
        assert_eq!(preview.picked_paths, vec!["/tmp/somedir"]);
        assert_eq!(preview.renamed_paths, vec!["/tmp/xsomedir"]);
        assert!(preview.mistakes.is_empty());
        assert!(preview.can_apply);
    }

    #[test]
    fn test_noop_rename_cannot_apply() {
        let preview = engine(&["/tmp/a.txt", "/tmp/b.txt"]).compute(&input(
            &["/tmp/a.txt", "/tmp/b.txt"],
            "a",
            "a",
            RenameTarget::Name,
        ));
        assert_eq!(preview.renamed_paths, preview.picked_paths);
        assert!(preview.mistakes.is_empty());
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_empty_regex_is_identity() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a.txt"],
            "",
            "whatever",
            RenameTarget::Full,
        ));
        assert_eq!(preview.renamed_paths, vec!["/tmp/a.txt"]);
        assert!(preview.mistakes.is_empty());
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_empty_replacement_is_identity() {
        let preview = engine(&[]).compute(&input(&["/tmp/a.txt"], "a", "", RenameTarget::Name));
        assert_eq!(preview.renamed_paths, vec!["/tmp/a.txt"]);
        assert!(preview.mistakes.is_empty());
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_invalid_regex_single_mistake() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a.txt", "/tmp/b.txt"],
            "(unbalanced",
            "x",
            RenameTarget::Name,
        ));
        assert_eq!(preview.mistakes.len(), 1);
        assert!(matches!(preview.mistakes[0], Mistake::InvalidRegex { .. }));
        assert_eq!(preview.renamed_paths, preview.picked_paths);
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_invalid_replace_pattern_publishes_nothing() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a.txt"],
            "(a)",
            "$2",
            RenameTarget::Name,
        ));
        assert_eq!(preview.mistakes.len(), 1);
        assert!(matches!(
            preview.mistakes[0],
            Mistake::InvalidReplacePattern { .. }
        ));
        assert!(preview.renamed_paths.is_empty());
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_name_target_keeps_parent() {
        let preview = engine(&[]).compute(&input(
            &["/data/a/file_a.txt"],
            "a",
            "b",
            RenameTarget::Name,
        ));
        assert_eq!(preview.renamed_paths, vec!["/data/a/file_b.txt"]);
    }

    #[test]
    fn test_stem_target_keeps_extension() {
        let preview = engine(&[]).compute(&input(
            &["/data/photo.jpg", "/data/.profile"],
            "^",
            "old_",
            RenameTarget::Stem,
        ));
        assert_eq!(
            preview.renamed_paths,
            vec!["/data/old_photo.jpg", "/data/old_.profile"]
        );

        let preview = engine(&[]).compute(&input(
            &["/data/photo.jpg"],
            "jpg",
            "png",
            RenameTarget::Stem,
        ));
        assert_eq!(preview.renamed_paths, vec!["/data/photo.jpg"]);
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_duplicates_flag_every_index() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a1.txt", "/tmp/a2.txt", "/tmp/b.txt", "/tmp/a3.txt"],
            r"\d",
            "",
            RenameTarget::Stem,
        ));
        // Empty replacement never renames
        assert!(preview.mistakes.is_empty());

        let preview = engine(&[]).compute(&input(
            &["/tmp/a1.txt", "/tmp/a2.txt", "/tmp/b.txt", "/tmp/a3.txt"],
            r"a\d",
            "a",
            RenameTarget::Stem,
        ));
        assert_eq!(
            preview.mistakes,
            vec![
                Mistake::Duplicate { index: 0 },
                Mistake::Duplicate { index: 1 },
                Mistake::Duplicate { index: 3 },
            ]
        );
        assert!(!preview.can_apply);
    }

    #[test]
    fn test_exists_only_when_changed() {
        let preview = engine(&["/tmp/a.txt", "/tmp/b.txt"]).compute(&input(
            &["/tmp/a.txt", "/tmp/c.txt"],
            "[ac]",
            "b",
            RenameTarget::Stem,
        ));
        assert_eq!(
            preview.mistakes,
            vec![
                Mistake::Exists { index: 0 },
                Mistake::Duplicate { index: 0 },
                Mistake::Duplicate { index: 1 },
                Mistake::Exists { index: 1 },
            ]
        );

        // Unchanged path that exists is not a collision
        let preview = engine(&["/tmp/a.txt"]).compute(&input(
            &["/tmp/a.txt", "/tmp/x.txt"],
            "x",
            "y",
            RenameTarget::Stem,
        ));
        assert!(preview.mistakes.is_empty());
        assert!(preview.can_apply);
    }

    #[test]
    fn test_invalid_destination() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a.txt"],
            "a",
            "x\0",
            RenameTarget::Stem,
        ));
        assert!(matches!(
            preview.mistakes.as_slice(),
            [Mistake::InvalidDestination { index: 0, .. }]
        ));
    }

    #[test]
    fn test_whole_name_replacements() {
        let preview = engine(&[]).compute(&input(
            &["/tmp/a.txt"],
            ".*",
            "${0}",
            RenameTarget::Name,
        ));
        assert!(preview.mistakes.is_empty());

        let preview = engine(&[]).compute(&input(
            &["/tmp/abc"],
            "^abc$",
            "$$",
            RenameTarget::Name,
        ));
        assert_eq!(preview.renamed_paths, vec!["/tmp/$"]);

        // No second, empty match right after the first one
        let preview = engine(&[]).compute(&input(
            &["/tmp/abc"],
            "[a-z]*$",
            "X",
            RenameTarget::Name,
        ));
        assert_eq!(preview.renamed_paths, vec!["/tmp/X"]);

        let preview = engine(&[]).compute(&input(
            &["/tmp/abc"],
            "^abc$",
            "${0}/",
            RenameTarget::Name,
        ));
        assert!(matches!(
            preview.mistakes.as_slice(),
            [Mistake::InvalidDestination { index: 0, .. }]
        ));
    }

    #[test]
    fn test_decomposed_input_matches_composed_regex() {
        // "é" typed composed, path stored decomposed
        let preview = engine(&[]).compute(&input(
            &["/tmp/e\u{301}e\u{301}e\u{301}.txt"],
            "\u{e9}{3}",
            "x",
            RenameTarget::Stem,
        ));
        assert_eq!(preview.renamed_paths, vec!["/tmp/x.txt"]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let engine = engine(&["/tmp/b.txt"]);
        let input = input(
            &["/tmp/a.txt", "/tmp/c.txt"],
            "[ac]",
            "b",
            RenameTarget::Stem,
        );
        assert_eq!(engine.compute(&input), engine.compute(&input));
    }

    #[test]
    fn test_changes_and_mistakes_for() {
        let preview = engine(&["/tmp/taken.txt"]).compute(&input(
            &["/tmp/keep.txt", "/tmp/free.txt"],
            "free",
            "taken",
            RenameTarget::Stem,
        ));
        let changes = preview.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].index, 1);
        assert_eq!(preview.mistakes_for(1).count(), 1);
        assert_eq!(preview.mistakes_for(0).count(), 0);
    }

    #[test]
    fn test_no_paths() {
        let preview = engine(&[]).compute(&input(&[], "a", "b", RenameTarget::Name));
        assert!(preview.renamed_paths.is_empty());
        assert!(!preview.can_apply);
    }
}
