#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod apply;
pub mod config;
pub mod engine;
pub mod fs;
pub mod history;
pub mod lock;
pub mod mistake;
pub mod normalize;
pub mod operations;
pub mod output;
pub mod pattern;
pub mod platform;
pub mod session;
pub mod target;

pub use apply::{apply_renames, revert_renames, ApplyError, ApplyOptions, RollbackFailure};
pub use config::{Config, DefaultsConfig};
pub use engine::{PathEntry, Preview, RenameEngine, RenameInput};
pub use fs::{FileSystem, OsFileSystem};
pub use history::{History, HistoryEntry};
pub use lock::LockFile;
pub use mistake::Mistake;
pub use normalize::{normalize, normalize_path, normalize_paths};
pub use operations::{apply_operation, history_operation, preview_operation, undo_operation};
pub use output::{
    ApplyResult, HistoryItem, HistoryResult, OutputFormat, OutputFormatter, PreviewEntry,
    PreviewResult, UndoResult, VersionResult,
};
pub use pattern::{compile_regex, ReplacePattern, ReplacePatternError};
pub use platform::Platform;
pub use session::{Session, SessionError, SessionState};
pub use target::RenameTarget;
