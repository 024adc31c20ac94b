//! Configuration management for the cache planner
//!
//! Supports configuration via:
//! 1. Config file (~/.config/cache-planner/config.toml)
//! 2. Environment variables (CACHE_PLANNER_MODEL, CACHE_PLANNER_DISABLE_CACHE)
//! 3. CLI arguments (override file/env settings)

use crate::cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model selection
    pub model: ModelSettings,

    /// Cache planning switches
    pub cache: CacheConfig,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model used when the CLI is not given one (can also use CACHE_PLANNER_MODEL)
    pub default_model: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            default_model: "anthropic.claude-3-7-sonnet-20250219-v1:0".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cache-planner")
            .join("config.toml")
    }

    /// Load config from default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from specific path
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self::read_from(path)?.with_env_overrides())
    }

    /// Read the file as written, without environment overrides
    pub fn read_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("CACHE_PLANNER_MODEL") {
            if !model.trim().is_empty() {
                self.model.default_model = model.trim().to_string();
            }
        }
        if let Ok(flag) = std::env::var("CACHE_PLANNER_DISABLE_CACHE") {
            if parse_bool(&flag).unwrap_or(false) {
                self.cache.enabled = false;
            }
        }

        self
    }

    /// Save config to default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to specific path
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.default_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model.default_model".to_string(),
                value: self.model.default_model.clone(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }

    /// Set a value by dotted key (e.g. `cache.tools`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "model.default_model" => {
                if value.trim().is_empty() {
                    return Err(invalid());
                }
                self.model.default_model = value.trim().to_string();
            }
            "cache.enabled" => self.cache.enabled = parse_bool(value).ok_or_else(invalid)?,
            "cache.messages" => self.cache.messages = parse_bool(value).ok_or_else(invalid)?,
            "cache.system" => self.cache.system = parse_bool(value).ok_or_else(invalid)?,
            "cache.tools" => self.cache.tools = parse_bool(value).ok_or_else(invalid)?,
            "logging.level" => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid());
                }
                self.logging.level = level;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }

    /// Planner configuration derived from the cache section
    pub fn cache_config(&self) -> CacheConfig {
        self.cache
    }

    /// Generate example config content
    pub fn example() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for creating Config programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.model.default_model = model.into();
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache.enabled = enabled;
        self
    }

    pub fn cache_tools(mut self, enabled: bool) -> Self {
        self.config.cache.tools = enabled;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
