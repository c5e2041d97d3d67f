use crate::target::RenameTarget;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const HISTORY_FILE_NAME: &str = "history.json";

/// One applied batch of renames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this batch
    pub id: String,
    /// When the batch was applied (RFC 3339)
    pub created_at: String,
    pub regex: String,
    pub replace_pattern: String,
    pub target: RenameTarget,
    /// Renames that were performed (from -> to), in the order they ran
    pub renames: Vec<(PathBuf, PathBuf)>,
    /// Whether the batch has been undone
    #[serde(default)]
    pub reverted: bool,
}

impl HistoryEntry {
    pub fn new(
        regex: &str,
        replace_pattern: &str,
        target: RenameTarget,
        renames: Vec<(PathBuf, PathBuf)>,
    ) -> Self {
        Self {
            id: generate_id(regex, replace_pattern, &renames),
            created_at: chrono::Local::now().to_rfc3339(),
            regex: regex.to_string(),
            replace_pattern: replace_pattern.to_string(),
            target,
            renames,
            reverted: false,
        }
    }
}

fn generate_id(regex: &str, replace_pattern: &str, renames: &[(PathBuf, PathBuf)]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(regex.as_bytes());
    hasher.update(replace_pattern.as_bytes());
    for (from, to) in renames {
        hasher.update(from.to_string_lossy().as_bytes());
        hasher.update(to.to_string_lossy().as_bytes());
    }
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    hasher.update(nanos.to_string().as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

/// The journal of applied batches, stored as JSON in the state directory
pub struct History {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Load history from the state directory
    pub fn load(state_dir: &Path) -> Result<Self> {
        Self::load_from_path(&state_dir.join(HISTORY_FILE_NAME))
    }

    /// Load history from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open history file: {}", path.display()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse history file: {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Save the history to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to create history file: {}", self.path.display()))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.entries)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        Ok(())
    }

    /// Add a new entry and persist
    pub fn add_entry(&mut self, entry: HistoryEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(anyhow!("History entry with ID {} already exists", entry.id));
        }

        self.entries.push(entry);
        self.save()
    }

    pub fn find_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Most recent entry that has not been undone yet
    pub fn last_undoable(&self) -> Option<&HistoryEntry> {
        self.entries.iter().rev().find(|e| !e.reverted)
    }

    /// Resolve `latest` or an explicit ID to an entry
    pub fn resolve(&self, id: &str) -> Result<&HistoryEntry> {
        if id == "latest" {
            self.last_undoable()
                .ok_or_else(|| anyhow!("No rename in history can be undone"))
        } else {
            self.find_entry(id)
                .ok_or_else(|| anyhow!("History entry '{}' not found", id))
        }
    }

    /// Flag an entry as undone and persist
    pub fn mark_reverted(&mut self, id: &str) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow!("History entry '{}' not found", id))?;
        entry.reverted = true;
        self.save()
    }

    /// All entries, newest first, optionally limited to the most recent N
    pub fn list_entries(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let entries = self.entries.iter().rev();
        match limit {
            Some(limit) => entries.take(limit).collect(),
            None => entries.collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prune history to keep it under a certain size
    pub fn prune(&mut self, max_entries: usize) -> Result<()> {
        if self.entries.len() > max_entries {
            let to_remove = self.entries.len() - max_entries;
            self.entries.drain(0..to_remove);
            self.save()?;
        }
        Ok(())
    }
}
