//! Configuration for handler selection.
//!
//! Lets deployments pick handlers without touching code, e.g. refuse
//! deprecated calls in development and only warn in production:
//!
//! ```yaml
//! default_handler: warn
//! overrides:
//!   Car: exception
//! ```
//!
//! Supports YAML files and environment variable overrides.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use crate::handler::builtins;

/// Default configuration file name (extension optional).
pub const DEFAULT_CONFIG_FILE: &str = "dont";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "DONT_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "DONT";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "DONT_LOG";

static GLOBAL: OnceLock<Settings> = OnceLock::new();

/// Handler selection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Handler for annotated types that do not declare one.
    pub default_handler: String,
    /// Handler per type name, taking precedence over the declared handler.
    pub overrides: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_handler: builtins::EXCEPTION.to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from files and environment.
    ///
    /// Sources (later overrides earlier):
    /// 1. `dont.yaml` in the current directory (if it exists)
    /// 2. File given by `path` (if provided)
    /// 3. File named by `CONFIG_ENV_VAR` (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX`, e.g. `DONT__DEFAULT_HANDLER=warn`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse settings from a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Process-wide settings, loaded on first use.
    ///
    /// Falls back to defaults if loading fails.
    pub fn global() -> &'static Settings {
        GLOBAL.get_or_init(|| {
            Settings::load(None).unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        })
    }

    /// Make these the process-wide settings.
    ///
    /// Must happen before anything reads [`Settings::global`].
    pub fn install(self) -> Result<(), ConfigError> {
        GLOBAL.set(self).map_err(|_| ConfigError::AlreadyInstalled)
    }

    /// Handler for `type_name`: override, then `declared`, then the default.
    ///
    /// An override keyed exactly by `type_name` wins over keys that only match
    /// ignoring case; among those the smallest key is used.
    pub fn handler_for(&self, type_name: &str, declared: Option<&str>) -> String {
        self.overrides
            .get(type_name)
            .or_else(|| {
                self.overrides
                    .iter()
                    .filter(|(name, _)| name.eq_ignore_ascii_case(type_name))
                    .min_by_key(|(name, _)| name.as_str())
                    .map(|(_, handler)| handler)
            })
            .map(String::as_str)
            .or(declared)
            .unwrap_or(&self.default_handler)
            .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Settings already installed")]
    AlreadyInstalled,
}
