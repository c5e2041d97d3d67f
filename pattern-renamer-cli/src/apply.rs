use anyhow::Result;
use pattern_renamer_core::{apply_operation, Config, OutputFormatter};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cli::{OutputFormat, PathArgs};
use crate::preview::build_input;

pub fn handle_apply(
    args: &PathArgs,
    config: &Config,
    state_dir: &Path,
    output: OutputFormat,
    interrupted: Arc<AtomicBool>,
) -> Result<()> {
    let input = build_input(args, config)?;
    let result = apply_operation(&input, config, state_dir, Some(interrupted))?;

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => print!("{}", result.format_summary()),
    }

    Ok(())
}
