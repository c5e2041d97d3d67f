use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::{OutputFormat, PreviewFormat, TargetArg};

/// Batch rename files with a regular expression
#[derive(Parser, Debug)]
#[command(name = "pattern-renamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory holding the rename history and lock file
    #[arg(long, global = true, value_name = "DIR", env = "PATTERN_RENAMER_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Configuration file to read instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments shared by the commands that compute a rename
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Regular expression to search for
    pub regex: String,

    /// Replacement pattern ($1, ${name} and $$ are supported)
    pub replacement: String,

    /// Files and directories to rename
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Part of each path the pattern applies to [default: from config, else name]
    #[arg(long, value_enum)]
    pub target: Option<TargetArg>,

    /// Rename the files beneath directory arguments instead of the directories
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the renamed paths and every problem without renaming anything
    Preview {
        #[command(flatten)]
        paths: PathArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: PreviewFormat,
    },

    /// Rename the files, all or nothing
    Apply {
        #[command(flatten)]
        paths: PathArgs,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Undo a previously applied rename
    Undo {
        /// History ID to undo (use 'latest' for the most recent batch not yet undone)
        #[arg(default_value = "latest")]
        id: String,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Show applied renames, newest first
    History {
        /// Limit number of entries
        #[arg(long)]
        limit: Option<usize>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}
