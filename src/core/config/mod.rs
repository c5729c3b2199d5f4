//! core::config
//!
//! Configuration schema, loading and connection resolution.
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$SRSTATS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/srstats/config.toml`
//! 3. `~/.srstats/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Connection Precedence
//!
//! The registry URL is taken from the first source that provides one:
//! 1. `--url`
//! 2. `--registry <name>` from the config file
//! 3. The config file's default registry (or its first one)
//! 4. `SCHEMA_REGISTRY_URL` with `SCHEMA_REGISTRY_BASIC_AUTH_USER_INFO`
//!
//! `--username`, `--password` and `--context` then override whatever the
//! chosen source supplied.
//!
//! # Example
//!
//! ```no_run
//! use srstats::core::config::{Config, ConnectionOverrides};
//!
//! let result = Config::load().unwrap();
//! let config = result.config;
//!
//! let target = config.resolve_target(&ConnectionOverrides::default()).unwrap();
//! println!("Registry: {}", target.url);
//! println!("Workers: {}", config.workers());
//! ```

pub mod schema;

pub use schema::{ConfigFile, RegistryEntry, StatsDefaults};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::registry::RegistryTarget;
use crate::stats::DEFAULT_WORKERS;
use crate::ui::output::OutputFormat;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SRSTATS_CONFIG";

/// Environment variable with a registry URL, used when nothing else is configured.
pub const URL_ENV: &str = "SCHEMA_REGISTRY_URL";

/// Environment variable with `user:password` for [`URL_ENV`].
pub const USER_INFO_ENV: &str = "SCHEMA_REGISTRY_BASIC_AUTH_USER_INFO";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("registry '{0}' not found in config")]
    UnknownRegistry(String),

    #[error(
        "no schema registry URL configured: use --url, add a registry to the config file, or set SCHEMA_REGISTRY_URL"
    )]
    MissingUrl,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Connection settings given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub url: Option<String>,
    pub registry: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub context: Option<String>,
}

/// Loaded configuration.
///
/// Accessors apply defaults for anything the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file (defaults if none was found)
    pub file: ConfigFile,
    /// Path the file was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. A missing config file is not an error.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        // 1. Check $SRSTATS_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path, warnings);
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/srstats/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("srstats/config.toml");
            if path.exists() {
                return Self::load_from(&path, warnings);
            }
        }

        // 3. Check ~/.srstats/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".srstats/config.toml");
            if path.exists() {
                return Self::load_from(&path, warnings);
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    /// Load and validate a specific config file.
    pub fn load_file(path: &Path) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(path, Vec::new())
    }

    fn load_from(
        path: &Path,
        mut warnings: Vec<ConfigWarning>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let file = Self::read_config(path)?;
        file.validate()?;

        let defaults = file.registries.iter().filter(|r| r.default).count();
        if defaults > 1 {
            warnings.push(ConfigWarning {
                message: format!(
                    "{} registries are marked default, using the first one",
                    defaults
                ),
                path: path.to_path_buf(),
            });
        }

        Ok(ConfigLoadResult {
            config: Config {
                file,
                path: Some(path.to_path_buf()),
            },
            warnings,
        })
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Number of stats workers.
    ///
    /// Defaults to 20 if not configured.
    pub fn workers(&self) -> usize {
        self.file
            .stats
            .as_ref()
            .and_then(|s| s.workers)
            .unwrap_or(DEFAULT_WORKERS)
    }

    /// Check if detailed stats are shown by default.
    ///
    /// Defaults to `false` if not configured.
    pub fn detailed(&self) -> bool {
        self.file
            .stats
            .as_ref()
            .and_then(|s| s.detailed)
            .unwrap_or(false)
    }

    /// Get the default output format.
    ///
    /// Defaults to table if not configured.
    pub fn default_output(&self) -> OutputFormat {
        self.file
            .default_output
            .as_deref()
            .and_then(OutputFormat::parse)
            .unwrap_or_default()
    }

    /// Look up a registry by name.
    pub fn registry(&self, name: &str) -> Option<&RegistryEntry> {
        self.file.registries.iter().find(|r| r.name == name)
    }

    /// The registry marked default, or the first one.
    pub fn default_registry(&self) -> Option<&RegistryEntry> {
        self.file
            .registries
            .iter()
            .find(|r| r.default)
            .or_else(|| self.file.registries.first())
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Connection resolution
    // =========================================================================

    /// Resolve the registry to connect to, reading the process environment.
    ///
    /// # Errors
    ///
    /// - `UnknownRegistry` if `--registry` names no configured registry
    /// - `MissingUrl` if no source provides a URL
    pub fn resolve_target(
        &self,
        overrides: &ConnectionOverrides,
    ) -> Result<RegistryTarget, ConfigError> {
        self.resolve_target_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve the registry to connect to, reading variables through `env`.
    pub fn resolve_target_with_env(
        &self,
        overrides: &ConnectionOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<RegistryTarget, ConfigError> {
        let mut target = if let Some(url) = non_empty(&overrides.url) {
            RegistryTarget::new(url)
        } else if let Some(name) = non_empty(&overrides.registry) {
            let entry = self
                .registry(name)
                .ok_or_else(|| ConfigError::UnknownRegistry(name.to_string()))?;
            target_from_entry(entry)
        } else if let Some(entry) = self.default_registry() {
            target_from_entry(entry)
        } else {
            target_from_env(&env)
        };

        if let Some(username) = non_empty(&overrides.username) {
            target.username = Some(username.to_string());
        }
        if let Some(password) = non_empty(&overrides.password) {
            target.password = Some(password.to_string());
        }
        if let Some(context) = non_empty(&overrides.context) {
            target.context = Some(context.to_string());
        }

        if target.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        Ok(target)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn target_from_entry(entry: &RegistryEntry) -> RegistryTarget {
    RegistryTarget {
        url: entry.url.clone(),
        username: entry.username.clone().filter(|u| !u.is_empty()),
        password: entry.password.clone(),
        context: entry.context.clone(),
    }
}

fn target_from_env(env: &impl Fn(&str) -> Option<String>) -> RegistryTarget {
    let mut target = RegistryTarget::new(env(URL_ENV).unwrap_or_default());
    if let Some(user_info) = env(USER_INFO_ENV) {
        // Only `user:password` is understood
        if let Some((user, pass)) = user_info.split_once(':') {
            target.username = Some(user.to_string());
            target.password = Some(pass.to_string());
        }
    }
    target
}
