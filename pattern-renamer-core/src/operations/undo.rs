use crate::apply::{revert_renames, ApplyOptions};
use crate::fs::OsFileSystem;
use crate::history::History;
use crate::lock::LockFile;
use crate::output::UndoResult;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// High-level undo operation - equivalent to `pattern-renamer undo`
///
/// `id` is a history entry id or `latest` for the most recent batch that has
/// not been undone.
pub fn undo_operation(
    id: &str,
    state_dir: &Path,
    interrupt: Option<Arc<AtomicBool>>,
) -> Result<UndoResult> {
    let _lock = LockFile::acquire(state_dir)?;

    let mut history = History::load(state_dir)?;
    undo_entry(&mut history, id, &ApplyOptions { interrupt })
}

/// Revert the renames of one entry, then flag it as undone
fn undo_entry(history: &mut History, id: &str, options: &ApplyOptions) -> Result<UndoResult> {
    let entry = history.resolve(id)?.clone();
    if entry.reverted {
        bail!("Rename '{}' has already been undone", entry.id);
    }

    let reverted = revert_renames(&OsFileSystem, &entry.renames, options)?;
    history.mark_reverted(&entry.id).with_context(|| {
        format!(
            "Renames of '{}' were reverted but history could not be updated",
            entry.id
        )
    })?;

    tracing::info!(id = %entry.id, renames = reverted.len(), "batch undone");

    Ok(UndoResult {
        history_id: entry.id,
        renames_reverted: reverted.len(),
    })
}
