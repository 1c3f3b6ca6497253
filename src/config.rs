//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/guesser/guesser.toml`
//! 3. Explicit config file given on the command line
//! 4. Environment variables: `GUESSER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{ParseLimits, WriteOptions, DEFAULT_INDENT, MAX_TREE_DEPTH, MAX_VALUE_LENGTH};

/// Unified configuration for guesser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tree file used when none is given on the command line
    pub database: PathBuf,
    /// Longest question or answer, in bytes
    pub max_value_length: usize,
    /// Deepest nesting accepted when reading a tree file
    pub max_tree_depth: usize,
    /// Spaces per nesting level when writing a tree file
    pub indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("guesser.db"),
            max_value_length: MAX_VALUE_LENGTH,
            max_tree_depth: MAX_TREE_DEPTH,
            indent: DEFAULT_INDENT,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub database: Option<PathBuf>,
    pub max_value_length: Option<usize>,
    pub max_tree_depth: Option<usize>,
    pub indent: Option<usize>,
}

/// Get the XDG config directory for guesser.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "guesser").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("guesser.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Reads one environment override; `None` when the variable is not set.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("GUESSER_{}: {}", key.to_uppercase(), e),
        }),
    }
}

impl Settings {
    /// Scalar merge: overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            database: overlay
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone()),
            max_value_length: overlay.max_value_length.unwrap_or(self.max_value_length),
            max_tree_depth: overlay.max_tree_depth.unwrap_or(self.max_tree_depth),
            indent: overlay.indent.unwrap_or(self.indent),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Config file named on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Load only the given file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply GUESSER_* environment variables as explicit overrides.
    ///
    /// Unset variables keep the current value; a value that does not parse
    /// is a config error.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("GUESSER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<String>(&config, "database")? {
            settings.database = PathBuf::from(val);
        }
        if let Some(val) = env_value(&config, "max_value_length")? {
            settings.max_value_length = val;
        }
        if let Some(val) = env_value(&config, "max_tree_depth")? {
            settings.max_tree_depth = val;
        }
        if let Some(val) = env_value(&config, "indent")? {
            settings.indent = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_value_length == 0 {
            return Err(ApplicationError::Config {
                message: "max_value_length must be positive".into(),
            });
        }
        if self.max_tree_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_tree_depth must be positive".into(),
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> ParseLimits {
        ParseLimits {
            max_value_length: self.max_value_length,
            max_depth: self.max_tree_depth,
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.indent,
        }
    }

    /// Render as TOML, for `config show`-style output.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
