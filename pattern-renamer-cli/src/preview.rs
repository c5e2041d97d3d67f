use anyhow::Result;
use pattern_renamer_core::{preview_operation, Config, OutputFormatter, RenameInput};

use crate::cli::{PathArgs, PreviewFormat};
use crate::paths::collect_paths;

/// Print the preview; returns whether it is free of mistakes
pub fn handle_preview(
    args: &PathArgs,
    config: &Config,
    output: PreviewFormat,
    use_color: bool,
) -> Result<bool> {
    let input = build_input(args, config)?;
    let result = preview_operation(&input, config);

    match output {
        PreviewFormat::Json => println!("{}", result.format_json()),
        PreviewFormat::Table => print!("{}", result.render_table(use_color)),
        PreviewFormat::Summary => print!("{}", result.render_summary(use_color)),
    }

    Ok(result.mistakes.is_empty())
}

pub fn build_input(args: &PathArgs, config: &Config) -> Result<RenameInput> {
    let paths = collect_paths(&args.paths, args.recursive)?;
    let target = args.target.map_or(config.defaults.target, Into::into);
    Ok(RenameInput::new(
        &paths,
        &args.regex,
        &args.replacement,
        target,
    ))
}
