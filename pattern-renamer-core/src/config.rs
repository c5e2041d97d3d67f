use crate::platform::Platform;
use crate::target::RenameTarget;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultsConfig {
    /// Which part of each path the pattern applies to: "full", "name" or "stem"
    #[serde(default)]
    pub target: RenameTarget,

    /// Path rules to validate destinations against (None = host platform)
    #[serde(default)]
    pub platform: Option<Platform>,

    /// How many applied batches to keep for undo
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            target: RenameTarget::default(),
            platform: None,
            max_history: default_max_history(),
            use_color: None,
        }
    }
}

fn default_max_history() -> usize {
    100
}

impl Config {
    /// Load config from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn platform(&self) -> Platform {
        self.defaults.platform.unwrap_or_else(Platform::host)
    }
}
