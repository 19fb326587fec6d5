//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/shelf/config.toml)
//! 3. Environment variables (SHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transition::TransitionTiming;

/// Environment variable prefix
const ENV_PREFIX: &str = "SHELF";

/// Keys accepted by `shelf config set`
pub const CONFIG_KEYS: &[&str] = &[
    "dataset",
    "base_url",
    "search_debounce_ms",
    "animations",
    "data_dir",
    "log_file",
];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dataset location: a file path, a path relative to `base_url`, or a full URL
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Base URL the dataset path is resolved against (optional)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Quiet period before a search query is applied
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Whether card transitions are animated
    #[serde(default = "default_animations")]
    pub animations: bool,

    /// Directory for local state (debug log)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log file for TUI debug logging (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            base_url: None,
            search_debounce_ms: default_search_debounce_ms(),
            animations: default_animations(),
            data_dir: default_data_dir(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHELF_DATASET, SHELF_BASE_URL, ...)
    /// 2. Config file (~/.config/shelf/config.toml or SHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SHELF_DATASET
        if let Ok(val) = std::env::var(format!("{}_DATASET", ENV_PREFIX)) {
            if !val.is_empty() {
                self.dataset = val;
            }
        }

        // SHELF_BASE_URL
        if let Ok(val) = std::env::var(format!("{}_BASE_URL", ENV_PREFIX)) {
            self.base_url = if val.is_empty() { None } else { Some(val) };
        }

        // SHELF_SEARCH_DEBOUNCE_MS
        if let Ok(val) = std::env::var(format!("{}_SEARCH_DEBOUNCE_MS", ENV_PREFIX)) {
            if let Ok(ms) = val.parse() {
                self.search_debounce_ms = ms;
            }
        }

        // SHELF_ANIMATIONS
        if let Ok(val) = std::env::var(format!("{}_ANIMATIONS", ENV_PREFIX)) {
            self.animations = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Set a single key from its string form
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |v: &str| {
            if v.is_empty() || v == "none" {
                None
            } else {
                Some(v.to_string())
            }
        };

        match key {
            "dataset" => self.dataset = value.to_string(),
            "base_url" => self.base_url = optional(value),
            "search_debounce_ms" => {
                self.search_debounce_ms = value
                    .parse()
                    .context("Invalid value for search_debounce_ms. Use milliseconds.")?;
            }
            "animations" => {
                self.animations = value
                    .parse()
                    .context("Invalid value for animations. Use 'true' or 'false'.")?;
            }
            "data_dir" => self.data_dir = value.into(),
            "log_file" => self.log_file = optional(value).map(PathBuf::from),
            _ => anyhow::bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Ensure data directory exists
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelf")
            .join("config.toml")
    }

    /// Path of the TUI debug log
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn transition_timing(&self) -> TransitionTiming {
        if self.animations {
            TransitionTiming::default()
        } else {
            TransitionTiming::instant()
        }
    }
}

fn default_dataset() -> String {
    "data/books.json".to_string()
}

fn default_search_debounce_ms() -> u64 {
    400
}

fn default_animations() -> bool {
    true
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelf")
}
