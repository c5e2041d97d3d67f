use crate::engine::{Preview, RenameInput};
use crate::history::HistoryEntry;
use crate::mistake::Mistake;
use crate::target::RenameTarget;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use nu_ansi_term::Color as AnsiColor;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// One row of a preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewEntry {
    pub index: usize,
    pub picked: String,
    pub renamed: String,
    pub changed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub mistakes: Vec<Mistake>,
}

/// Result of a preview operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResult {
    pub regex: String,
    pub replace_pattern: String,
    pub target: RenameTarget,
    pub entries: Vec<PreviewEntry>,
    /// Every mistake, in detection order
    pub mistakes: Vec<Mistake>,
    pub can_apply: bool,
}

impl PreviewResult {
    pub fn new(input: &RenameInput, preview: &Preview) -> Self {
        let entries = if preview.renamed_paths.is_empty() {
            // Replacement was rejected: list the picked paths alone
            preview
                .picked_paths
                .iter()
                .enumerate()
                .map(|(index, picked)| PreviewEntry {
                    index,
                    picked: picked.clone(),
                    renamed: picked.clone(),
                    changed: false,
                    mistakes: Vec::new(),
                })
                .collect()
        } else {
            preview
                .entries()
                .into_iter()
                .map(|entry| PreviewEntry {
                    index: entry.index,
                    changed: entry.is_changed(),
                    mistakes: preview.mistakes_for(entry.index).cloned().collect(),
                    picked: entry.picked,
                    renamed: entry.renamed,
                })
                .collect()
        };

        Self {
            regex: input.regex.clone(),
            replace_pattern: input.replace_pattern.clone(),
            target: input.target,
            entries,
            mistakes: preview.mistakes.clone(),
            can_apply: preview.can_apply,
        }
    }

    pub fn changed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.changed).count()
    }

    /// Mistakes not tied to an entry (invalid regex or replacement)
    pub fn general_mistakes(&self) -> impl Iterator<Item = &Mistake> {
        self.mistakes.iter().filter(|m| !m.is_destination())
    }

    /// Human-readable listing, colored when `use_color` is set
    pub fn render_summary(&self, use_color: bool) -> String {
        let paint = |color: AnsiColor, text: &str| {
            if use_color {
                color.paint(text).to_string()
            } else {
                text.to_string()
            }
        };

        let mut output = String::new();
        writeln!(
            output,
            "Rename {} (target: {}): {} -> {}",
            if self.can_apply { "plan" } else { "preview" },
            self.target,
            self.regex,
            self.replace_pattern
        )
        .unwrap();

        for mistake in self.general_mistakes() {
            writeln!(output, "{}", paint(AnsiColor::Red, &mistake.to_string())).unwrap();
        }

        for entry in &self.entries {
            let picked = self.target.slice(&entry.picked);
            let renamed = self.target.slice(&entry.renamed);
            if entry.changed {
                writeln!(
                    output,
                    "  {} -> {}",
                    picked,
                    paint(AnsiColor::Green, renamed)
                )
                .unwrap();
            } else {
                writeln!(output, "  {} (unchanged)", paint(AnsiColor::DarkGray, picked)).unwrap();
            }
            for mistake in &entry.mistakes {
                writeln!(
                    output,
                    "    {}",
                    paint(AnsiColor::Red, &mistake.message())
                )
                .unwrap();
            }
        }

        writeln!(
            output,
            "{} of {} paths change, {} mistakes",
            self.changed_count(),
            self.entries.len(),
            self.mistakes.len()
        )
        .unwrap();

        output
    }

    /// Table of picked and renamed slices with the mistakes per entry
    pub fn render_table(&self, use_color: bool) -> String {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);

        if use_color {
            table.enforce_styling();
            table.set_header(vec![
                Cell::new("#").fg(Color::Cyan),
                Cell::new("Picked").fg(Color::Cyan),
                Cell::new("Renamed").fg(Color::Cyan),
                Cell::new("Mistakes").fg(Color::Cyan),
            ]);
        } else {
            table.set_header(vec!["#", "Picked", "Renamed", "Mistakes"]);
        }

        for entry in &self.entries {
            let mistakes = entry
                .mistakes
                .iter()
                .map(Mistake::kind)
                .collect::<Vec<_>>()
                .join(", ");
            let renamed = if entry.changed {
                self.target.slice(&entry.renamed)
            } else {
                "-"
            };

            let mut renamed_cell = Cell::new(renamed);
            let mut mistakes_cell = Cell::new(&mistakes);
            if use_color {
                if entry.changed {
                    renamed_cell = renamed_cell.fg(Color::Green);
                }
                mistakes_cell = mistakes_cell.fg(Color::Red);
            }

            table.add_row(vec![
                Cell::new(entry.index),
                Cell::new(self.target.slice(&entry.picked)),
                renamed_cell,
                mistakes_cell,
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        for mistake in self.general_mistakes() {
            writeln!(output, "{}", mistake).unwrap();
        }
        output
    }
}

/// Result of an apply operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResult {
    pub history_id: String,
    pub renames: Vec<(PathBuf, PathBuf)>,
}

/// Result of an undo operation
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoResult {
    pub history_id: String,
    pub renames_reverted: usize,
}

/// Result of a history operation
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResult {
    pub entries: Vec<HistoryItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: String,
    pub regex: String,
    pub replace_pattern: String,
    pub target: RenameTarget,
    pub renames: usize,
    pub reverted: bool,
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            timestamp: entry.created_at.clone(),
            regex: entry.regex.clone(),
            replace_pattern: entry.replace_pattern.clone(),
            target: entry.target,
            renames: entry.renames.len(),
            reverted: entry.reverted,
        }
    }
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for PreviewResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.mistakes.is_empty(),
            "operation": "preview",
            "regex": self.regex,
            "replace_pattern": self.replace_pattern,
            "target": self.target,
            "can_apply": self.can_apply,
            "summary": {
                "paths": self.entries.len(),
                "changed": self.changed_count(),
                "mistakes": self.mistakes.len(),
            },
            "entries": self.entries,
            "mistakes": self.mistakes,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        self.render_summary(false)
    }
}

impl OutputFormatter for ApplyResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "apply",
            "history_id": self.history_id,
            "summary": {
                "renames": self.renames.len(),
            },
            "renames": self.renames,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "✓ Renamed {} paths", self.renames.len()).unwrap();
        writeln!(
            output,
            "Undo with: pattern-renamer undo {}",
            self.history_id
        )
        .unwrap();
        output
    }
}

impl OutputFormatter for UndoResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "undo",
            "history_id": self.history_id,
            "summary": {
                "renames_reverted": self.renames_reverted,
            }
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!(
            "Successfully undid rename {}\n✓ Reverted {} renames\n",
            self.history_id, self.renames_reverted
        )
    }
}

impl OutputFormatter for HistoryResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "history",
            "entries": self.entries,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No renames in history\n".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["ID", "Date", "Target", "Regex", "Replace", "Renames", "Status"]);
        for entry in &self.entries {
            table.add_row(vec![
                Cell::new(&entry.id),
                Cell::new(&entry.timestamp),
                Cell::new(entry.target),
                Cell::new(&entry.regex),
                Cell::new(&entry.replace_pattern),
                Cell::new(entry.renames),
                Cell::new(if entry.reverted { "undone" } else { "applied" }),
            ]);
        }
        format!("{}\n", table)
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}\n", self.name, self.version)
    }
}
