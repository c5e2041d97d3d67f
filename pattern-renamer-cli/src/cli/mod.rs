pub mod args;
pub mod types;

pub use args::{Cli, Commands, PathArgs};
pub use types::{OutputFormat, PreviewFormat, TargetArg};
