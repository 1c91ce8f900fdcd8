// Configuration file handling

use crate::codec::DEFAULT_FILE;
use crate::store::DEFAULT_CAPACITY;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = "todostore";
const CONFIG_FILE: &str = "config.yml";

/// User configuration, loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where tasks are persisted
    pub file: PathBuf,
    /// Capacity of a freshly created store
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Default config location, e.g. `~/.config/todostore/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;

        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }

    /// Load from an explicit path, or the default location if there is one
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(eyre!("Config file not found: {}", path.display()));
                }
                Self::load(path)
            }
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(eyre!("initial_capacity must be at least 1"));
        }
        if self.file.as_os_str().is_empty() {
            return Err(eyre!("file cannot be empty"));
        }
        Ok(())
    }
}
