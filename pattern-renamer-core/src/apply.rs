//! All-or-nothing execution of a batch of renames.
//!
//! Every batch is validated before the first rename: sources must exist and
//! destinations must be free. Renames then run one by one; if any of them
//! fails, or the caller raises the interrupt flag, every rename already
//! performed is reverted in reverse order before the error is returned.

use crate::fs::{is_case_only_change, FileSystem};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Options for executing a batch of renames
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Checked before each rename; when set, the batch is rolled back
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl ApplyOptions {
    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// A rename that could not be reverted during rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackFailure {
    /// Where the entry currently is
    pub current: PathBuf,
    /// Where it should have been moved back to
    pub original: PathBuf,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("source {} does not exist", .0.display())]
    SourceMissing(PathBuf),

    #[error("destination {} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interrupted before renaming {}", .0.display())]
    Interrupted(PathBuf),

    #[error(
        "{error}; rollback failed for {} entries, the file set is inconsistent",
        .failures.len()
    )]
    RollbackFailed {
        error: Box<ApplyError>,
        failures: Vec<RollbackFailure>,
    },
}

impl ApplyError {
    /// Whether the filesystem was left exactly as it was before the batch
    pub fn is_rolled_back(&self) -> bool {
        !matches!(self, Self::RollbackFailed { .. })
    }
}

/// Tracks the renames performed so far in one batch
struct ApplyState<'a, F: FileSystem> {
    fs: &'a F,
    renames_performed: Vec<(PathBuf, PathBuf)>,
}

impl<'a, F: FileSystem> ApplyState<'a, F> {
    fn new(fs: &'a F) -> Self {
        Self {
            fs,
            renames_performed: Vec::new(),
        }
    }

    fn perform_rename(&mut self, from: &Path, to: &Path) -> Result<(), ApplyError> {
        // Re-check right before renaming: rename(2) silently replaces files
        if self.fs.exists(to) && !self.fs.same_entry(from, to) {
            return Err(ApplyError::DestinationExists(to.to_path_buf()));
        }

        rename_entry(self.fs, from, to)?;

        tracing::debug!(from = %from.display(), to = %to.display(), "renamed");
        self.renames_performed
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    /// Revert all performed renames, newest first. Entries already stranded
    /// by `error` stay listed in the returned failures.
    fn rollback(&mut self, error: ApplyError) -> ApplyError {
        let (error, mut failures) = match error {
            ApplyError::RollbackFailed { error, failures } => (*error, failures),
            other => (other, Vec::new()),
        };

        tracing::warn!(
            count = self.renames_performed.len(),
            %error,
            "rolling back renames"
        );

        while let Some((from, to)) = self.renames_performed.pop() {
            match rename_entry(self.fs, &to, &from) {
                Ok(()) => {},
                Err(ApplyError::RollbackFailed { failures: stranded, .. }) => {
                    failures.extend(stranded.into_iter().map(|failure| RollbackFailure {
                        original: from.clone(),
                        ..failure
                    }));
                },
                Err(e) => {
                    tracing::error!(
                        current = %to.display(),
                        original = %from.display(),
                        error = %e,
                        "failed to revert rename"
                    );
                    failures.push(RollbackFailure {
                        current: to,
                        original: from,
                        error: e.to_string(),
                    });
                },
            }
        }

        if failures.is_empty() {
            error
        } else {
            ApplyError::RollbackFailed {
                error: Box::new(error),
                failures,
            }
        }
    }
}

/// Rename one entry. Case-only changes go through a temporary name so they
/// also work on case-insensitive filesystems.
///
/// If the second step fails and the entry cannot be moved back from the
/// temporary name, the result is `RollbackFailed` naming the temporary path.
fn rename_entry<F: FileSystem>(fs: &F, from: &Path, to: &Path) -> Result<(), ApplyError> {
    let rename_error = |source: io::Error| ApplyError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let case_only = is_case_only_change(&from.to_string_lossy(), &to.to_string_lossy());
    if !(case_only && fs.same_entry(from, to)) {
        return fs.rename(from, to).map_err(rename_error);
    }

    let temp = temp_name(from);
    fs.rename(from, &temp).map_err(rename_error)?;
    let Err(e) = fs.rename(&temp, to) else {
        return Ok(());
    };

    match fs.rename(&temp, from) {
        Ok(()) => Err(rename_error(e)),
        Err(restore) => {
            tracing::error!(
                current = %temp.display(),
                original = %from.display(),
                error = %restore,
                "entry left under its temporary name"
            );
            Err(ApplyError::RollbackFailed {
                error: Box::new(rename_error(e)),
                failures: vec![RollbackFailure {
                    current: temp,
                    original: from.to_path_buf(),
                    error: restore.to_string(),
                }],
            })
        },
    }
}

fn temp_name(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        "{}.{}.pattern-renamer.tmp",
        name,
        std::process::id()
    ))
}

/// Check every pair before anything is touched
fn preflight<F: FileSystem>(fs: &F, renames: &[(PathBuf, PathBuf)]) -> Result<(), ApplyError> {
    for (from, to) in renames {
        if !fs.exists(from) {
            return Err(ApplyError::SourceMissing(from.clone()));
        }
        if fs.exists(to) && !fs.same_entry(from, to) {
            return Err(ApplyError::DestinationExists(to.clone()));
        }
    }
    Ok(())
}

/// Rename every `(from, to)` pair in order, all or nothing.
///
/// Returns the performed renames, which is the journal [`revert_renames`]
/// takes to undo the batch.
pub fn apply_renames<F: FileSystem>(
    fs: &F,
    renames: &[(PathBuf, PathBuf)],
    options: &ApplyOptions,
) -> Result<Vec<(PathBuf, PathBuf)>, ApplyError> {
    preflight(fs, renames)?;

    let mut state = ApplyState::new(fs);
    for (from, to) in renames {
        if options.interrupted() {
            return Err(state.rollback(ApplyError::Interrupted(from.clone())));
        }
        if let Err(e) = state.perform_rename(from, to) {
            return Err(state.rollback(e));
        }
    }

    tracing::info!(count = state.renames_performed.len(), "renames applied");
    Ok(state.renames_performed)
}

/// Undo a journal produced by [`apply_renames`], all or nothing
pub fn revert_renames<F: FileSystem>(
    fs: &F,
    journal: &[(PathBuf, PathBuf)],
    options: &ApplyOptions,
) -> Result<Vec<(PathBuf, PathBuf)>, ApplyError> {
    let inverse: Vec<(PathBuf, PathBuf)> = journal
        .iter()
        .rev()
        .map(|(from, to)| (to.clone(), from.clone()))
        .collect();
    apply_renames(fs, &inverse, options)
}
