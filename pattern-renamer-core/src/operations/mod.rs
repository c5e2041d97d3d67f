//! High-level operations that correspond to CLI commands
//!
//! These modules hold the logic behind each pattern-renamer command,
//! separated from CLI concerns like argument parsing and output formatting.

pub mod apply;
pub mod history;
pub mod preview;
pub mod undo;

pub use apply::apply_operation;
pub use history::history_operation;
pub use preview::preview_operation;
pub use undo::undo_operation;
