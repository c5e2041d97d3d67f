use crate::config::Config;
use crate::engine::RenameInput;
use crate::history::{History, HistoryEntry};
use crate::lock::LockFile;
use crate::output::ApplyResult;
use crate::session::Session;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// High-level apply operation - equivalent to `pattern-renamer apply`
///
/// Computes the preview, refuses it when it cannot be applied, renames the
/// batch and records it in the history under `state_dir`.
pub fn apply_operation(
    input: &RenameInput,
    config: &Config,
    state_dir: &Path,
    interrupt: Option<Arc<AtomicBool>>,
) -> Result<ApplyResult> {
    let _lock = LockFile::acquire(state_dir)?;

    let mut session = Session::new(config);
    if let Some(flag) = interrupt {
        session.set_interrupt(flag);
    }
    session.set_input(input);

    let renames = session.apply()?.to_vec();

    let input = session.input();
    let entry = HistoryEntry::new(
        &input.regex,
        &input.replace_pattern,
        input.target,
        renames.clone(),
    );
    let history_id = entry.id.clone();

    let mut history = History::load(state_dir)?;
    history
        .add_entry(entry)
        .context("Renames were applied but could not be recorded in history")?;
    history.prune(config.defaults.max_history)?;

    tracing::info!(id = %history_id, renames = renames.len(), "batch recorded");

    Ok(ApplyResult {
        history_id,
        renames,
    })
}
