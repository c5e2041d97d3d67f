use clap::ValueEnum;
use pattern_renamer_core::RenameTarget;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TargetArg {
    /// The whole path
    Full,
    /// The last path component
    Name,
    /// The last path component without its extension
    Stem,
}

impl From<TargetArg> for RenameTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Full => Self::Full,
            TargetArg::Name => Self::Name,
            TargetArg::Stem => Self::Stem,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl From<OutputFormat> for pattern_renamer_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Output of the preview command, which can also render a table
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PreviewFormat {
    Summary,
    Json,
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_arg_conversion() {
        assert_eq!(RenameTarget::from(TargetArg::Full), RenameTarget::Full);
        assert_eq!(RenameTarget::from(TargetArg::Name), RenameTarget::Name);
        assert_eq!(RenameTarget::from(TargetArg::Stem), RenameTarget::Stem);
    }
}
