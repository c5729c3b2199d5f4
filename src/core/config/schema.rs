//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Config File
//!
//! Located at (in order of precedence):
//! 1. `$SRSTATS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/srstats/config.toml`
//! 3. `~/.srstats/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing: registry entries must be
//! addressable and uniquely named, and defaults must be usable as-is.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::ui::output::OutputFormat;

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// default_output = "table"
///
/// [stats]
/// workers = 20
/// detailed = false
///
/// [[registries]]
/// name = "prod"
/// url = "https://sr.example.com"
/// username = "key"
/// password = "secret"
/// context = ".production"
/// default = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Default output format ("table" or "json")
    pub default_output: Option<String>,

    /// Stats command defaults
    pub stats: Option<StatsDefaults>,

    /// Named registries
    pub registries: Vec<RegistryEntry>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(output) = &self.default_output {
            if OutputFormat::parse(output).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid default_output '{}', must be one of: {}",
                    output,
                    OutputFormat::NAMES.join(", ")
                )));
            }
        }

        if let Some(stats) = &self.stats {
            stats.validate()?;
        }

        let mut names = HashSet::new();
        for entry in &self.registries {
            entry.validate()?;
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate registry name '{}'",
                    entry.name
                )));
            }
        }

        Ok(())
    }
}

/// Stats command defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StatsDefaults {
    /// Concurrent workers
    pub workers: Option<usize>,

    /// Show top-N breakdowns
    pub detailed: Option<bool>,
}

impl StatsDefaults {
    /// Validate the stats defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidValue(
                "stats.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A named registry connection.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    /// Name used with `--registry`
    pub name: String,

    /// Base URL of the REST API
    pub url: String,

    /// Basic auth username or API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password or API secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Schema context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Use when no registry is selected explicitly
    #[serde(default)]
    pub default: bool,
}

impl RegistryEntry {
    /// Validate one registry entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "registry name cannot be empty".to_string(),
            ));
        }
        if self.url.is_empty() {
            return Err(ConfigError::InvalidValue(format!(
                "registry '{}' has no url",
                self.name
            )));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "registry '{}' url must start with http:// or https://",
                self.name
            )));
        }
        Ok(())
    }
}

// Custom Debug to avoid exposing the password
impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .field("context", &self.context)
            .field("default", &self.default)
            .finish()
    }
}
