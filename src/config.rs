//! Configuration module for starwars
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/starwars/starwars.toml)
//! - User configuration (~/.starwars.toml)
//! - Project configuration (./starwars.toml)
//! - Environment variables
//!
//! An explicit path (`--config` or `STARWARS_CONFIG`) replaces the standard
//! locations.

use crate::modules::{ModuleParams, ModuleRegistry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Parameter defaults per module, applied when a task leaves them unset
    pub module_defaults: HashMap<String, ModuleParams>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Result format: "json" or "human"
    pub format: String,

    /// Use colors in human output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            color: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no -v flag or RUST_LOG is given
    pub log_level: String,

    /// Write logs to this file instead of stderr
    pub log_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_path: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                debug!(path = %path.display(), "loading configuration");
                config = config.merge_from_file(&path)?;
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Get the list of configuration file paths to check
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        if let Ok(env_config) = std::env::var("STARWARS_CONFIG") {
            return vec![PathBuf::from(env_config)];
        }

        let mut paths = vec![PathBuf::from("/etc/starwars/starwars.toml")];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".starwars.toml"));
        }

        paths.push(PathBuf::from("starwars.toml"));
        paths
    }

    /// Merge configuration from a file
    fn merge_from_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        Ok(self.merge(file_config))
    }

    /// Merge another config into this one
    fn merge(&self, other: Config) -> Config {
        let defaults = OutputConfig::default();
        Config {
            output: OutputConfig {
                format: if other.output.format != defaults.format {
                    other.output.format
                } else {
                    self.output.format.clone()
                },
                color: self.output.color && other.output.color,
            },
            logging: LoggingConfig {
                log_level: if other.logging.log_level != LoggingConfig::default().log_level {
                    other.logging.log_level
                } else {
                    self.logging.log_level.clone()
                },
                log_path: other
                    .logging
                    .log_path
                    .or_else(|| self.logging.log_path.clone()),
            },
            module_defaults: {
                let mut merged = self.module_defaults.clone();
                for (module, params) in other.module_defaults {
                    merged.entry(module).or_default().extend(params);
                }
                merged
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // STARWARS_SCHEME
        if let Ok(scheme) = std::env::var("STARWARS_SCHEME") {
            self.module_defaults
                .entry("movie".to_string())
                .or_default()
                .insert("scheme".to_string(), serde_json::Value::String(scheme));
        }

        // STARWARS_OUTPUT
        if let Ok(format) = std::env::var("STARWARS_OUTPUT") {
            self.output.format = format;
        }

        // STARWARS_LOG_LEVEL
        if let Ok(level) = std::env::var("STARWARS_LOG_LEVEL") {
            self.logging.log_level = level;
        }

        // STARWARS_LOG_PATH
        if let Ok(path) = std::env::var("STARWARS_LOG_PATH") {
            self.logging.log_path = Some(PathBuf::from(path));
        }

        // NO_COLOR
        if std::env::var("NO_COLOR").is_ok() || std::env::var("STARWARS_NO_COLOR").is_ok() {
            self.output.color = false;
        }
    }

    /// Check that module defaults only name known modules and parameters
    pub fn validate(&self, registry: &ModuleRegistry) -> crate::error::Result<()> {
        for (name, params) in &self.module_defaults {
            let module = registry.get(name).ok_or_else(|| {
                crate::error::Error::config(
                    "module_defaults",
                    format!(
                        "unknown module '{}' (known modules: {})",
                        name,
                        registry.names().join(", ")
                    ),
                )
            })?;
            let optional = module.optional_params();
            for param in params.keys() {
                if !optional.contains_key(param.as_str()) {
                    return Err(crate::error::Error::config(
                        "module_defaults",
                        format!("module '{}' has no optional parameter '{}'", name, param),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Whether human-readable output was requested
    pub fn is_human_output(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("human")
    }

    /// Load from a specific file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Config::default().merge_from_file(path.as_ref())
    }
}
