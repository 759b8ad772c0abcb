//! Configuration for jibjab.
//!
//! Loads config from:
//! 1. Global: `$XDG_CONFIG_HOME/jibjab/config.toml` (or `~/.config/jibjab/config.toml`)
//! 2. Per-project: `.jibjab/config.toml` (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [toolchain]
//! scratch_dir = "/tmp/jibjab"
//! search_path = ["/opt/homebrew/bin"]
//!
//! [toolchain.targets.c]
//! compile = ["cc", "-O2", "-o", "{out}", "{src}"]
//!
//! [interactive]
//! poll_interval_ms = 300
//! ```

use jibjab_toolchain::{InteractiveConfig, ToolchainConfig, ToolchainRunner};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub toolchain: ToolchainConfig,
    pub interactive: InteractiveConfig,
}

impl Config {
    /// Load configuration for a project rooted at `root`.
    ///
    /// A file that cannot be read or parsed is skipped with a warning.
    pub fn load(root: &Path) -> Self {
        Self::load_layers(Self::global_config_path().as_deref(), root)
    }

    /// Load with an explicit global config path.
    pub fn load_layers(global: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();
        let project = Self::project_config_path(root);
        for path in global.into_iter().chain([project.as_path()]) {
            match Self::load_file(path) {
                Ok(Some(layer)) => {
                    debug!(path = %path.display(), "loaded config");
                    config = config.merge(layer);
                }
                Ok(None) => {}
                Err(e) => warn!("{e}; using defaults for this layer"),
            }
        }
        config
    }

    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("jibjab").join("config.toml"))
    }

    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".jibjab").join("config.toml")
    }

    /// Read one config file. A missing file is `Ok(None)`.
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Layer `other` over `self`; anything `other` sets wins.
    pub fn merge(self, other: Self) -> Self {
        Self {
            toolchain: self.toolchain.merge(other.toolchain),
            interactive: self.interactive.merge(other.interactive),
        }
    }

    pub fn runner(&self) -> ToolchainRunner {
        ToolchainRunner::new(self.toolchain.clone(), self.interactive.clone())
    }
}
