use anyhow::Result;
use pattern_renamer_core::{undo_operation, OutputFormatter};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cli::OutputFormat;

pub fn handle_undo(
    id: &str,
    state_dir: &Path,
    output: OutputFormat,
    interrupted: Arc<AtomicBool>,
) -> Result<()> {
    let result = undo_operation(id, state_dir, Some(interrupted))?;
    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => print!("{}", result.format_summary()),
    }
    Ok(())
}
