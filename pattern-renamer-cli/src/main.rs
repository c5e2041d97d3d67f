use anyhow::{anyhow, Result};
use clap::Parser;
use pattern_renamer_core::{ApplyError, Config, OutputFormatter, SessionError, VersionResult};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod apply;
mod cli;
mod history;
mod paths;
mod preview;
mod undo;

use cli::{Cli, Commands, OutputFormat};

const APP_DIR: &str = "pattern-renamer";

fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let interrupted_clone = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nReceived SIGINT. Rolling back...");
        interrupted_clone.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!("failed to install Ctrl-C handler: {e}");
    }

    let config = load_config(cli.config.as_ref()).unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        process::exit(2);
    });
    let use_color = !cli.no_color
        && config
            .defaults
            .use_color
            .unwrap_or_else(|| io::stdout().is_terminal());

    let result = match cli.command {
        Commands::Preview { paths, output } => {
            match preview::handle_preview(&paths, &config, output, use_color) {
                Ok(true) => Ok(()),
                Ok(false) => process::exit(1),
                Err(e) => Err(e),
            }
        },

        Commands::Apply { paths, output } => state_dir(cli.state_dir).and_then(|state_dir| {
            apply::handle_apply(
                &paths,
                &config,
                &state_dir,
                output,
                Arc::clone(&interrupted),
            )
        }),

        Commands::Undo { id, output } => state_dir(cli.state_dir).and_then(|state_dir| {
            undo::handle_undo(&id, &state_dir, output, Arc::clone(&interrupted))
        }),

        Commands::History { limit, output } => state_dir(cli.state_dir)
            .and_then(|state_dir| history::handle_history(limit, &state_dir, output)),

        Commands::Version { output } => {
            handle_version(output);
            Ok(())
        },
    };

    if interrupted.load(Ordering::SeqCst) {
        if let Err(e) = &result {
            eprintln!("Error: {e:#}");
        }
        eprintln!("Operation interrupted");
        process::exit(130);
    }

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_from_path(path);
    }
    match dirs::config_dir() {
        Some(dir) => Config::load_or_default(&dir.join(APP_DIR).join("config.toml")),
        None => Ok(Config::default()),
    }
}

fn state_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| anyhow!("Could not determine a state directory; pass --state-dir"))
}

/// 1 when the rename is blocked by mistakes or conflicts, 2 for invalid
/// input, 3 for anything else
fn exit_code(error: &anyhow::Error) -> i32 {
    let apply_error = error.downcast_ref::<ApplyError>().or_else(|| {
        match error.downcast_ref::<SessionError>() {
            Some(SessionError::Apply(e)) => Some(e),
            _ => None,
        }
    });

    if matches!(
        error.downcast_ref::<SessionError>(),
        Some(SessionError::CannotApply { .. })
    ) {
        return 1;
    }

    match apply_error {
        Some(ApplyError::DestinationExists(_)) => 1,
        Some(ApplyError::SourceMissing(_)) => 2,
        Some(_) => 3,
        None => {
            let message = format!("{error:#}");
            if message.contains("not found")
                || message.contains("already been undone")
                || message.contains("can be undone")
                || message.contains("invalid")
            {
                2
            } else {
                3
            }
        },
    }
}

fn handle_version(output: OutputFormat) {
    let version_result = VersionResult {
        name: APP_DIR.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    print!("{}", version_result.format(output.into()));
    if output == OutputFormat::Json {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pattern_renamer_core::Mistake;

    #[test]
    fn test_exit_codes() {
        let blocked = anyhow::Error::from(SessionError::CannotApply {
            mistakes: vec![Mistake::Exists { index: 0 }],
        });
        assert_eq!(exit_code(&blocked), 1);

        let exists = anyhow::Error::from(SessionError::Apply(ApplyError::DestinationExists(
            PathBuf::from("/x"),
        )));
        assert_eq!(exit_code(&exists), 1);

        let missing = anyhow::Error::from(ApplyError::SourceMissing(PathBuf::from("/x")));
        assert_eq!(exit_code(&missing), 2);

        assert_eq!(exit_code(&anyhow!("History entry 'x' not found")), 2);
        assert_eq!(exit_code(&anyhow!("disk on fire")), 3);
    }
}
