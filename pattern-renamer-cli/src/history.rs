use anyhow::Result;
use pattern_renamer_core::{history_operation, OutputFormatter};
use std::path::Path;

use crate::cli::OutputFormat;

pub fn handle_history(limit: Option<usize>, state_dir: &Path, output: OutputFormat) -> Result<()> {
    let result = history_operation(limit, state_dir)?;

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => print!("{}", result.format_summary()),
    }

    Ok(())
}
