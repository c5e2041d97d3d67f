use crate::history::History;
use crate::output::{HistoryItem, HistoryResult};
use anyhow::Result;
use std::path::Path;

/// History operation - returns structured data
pub fn history_operation(limit: Option<usize>, state_dir: &Path) -> Result<HistoryResult> {
    let history = History::load(state_dir)?;
    let entries = history
        .list_entries(limit)
        .into_iter()
        .map(HistoryItem::from)
        .collect();

    Ok(HistoryResult { entries })
}
