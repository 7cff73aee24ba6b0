//! Configuration loader for stream-scheduler
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "SCHEDULER_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "SCHEDULER_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "SCHEDULER";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Unprefixed variables from earlier deployments and the keys they set.
///
/// Each applies only when the equivalent `SCHEDULER_*` variable is unset.
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("YOUTUBE_API_KEY", "platforms.youtube.api_key"),
    ("TWITCH_CLIENT_ID", "platforms.twitch.client_id"),
    ("TWITCH_CLIENT_SECRET", "platforms.twitch.client_secret"),
    ("PORT", "server.port"),
];

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. Legacy unprefixed variables (`YOUTUBE_API_KEY`, `PORT`, ...)
/// 5. `SCHEDULER_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`SCHEDULER_CONFIG_DIR`)
    /// - Specific configuration file (`SCHEDULER_CONFIG_FILE`)
    /// - Application environment (`SCHEDULER_APP_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `SCHEDULER_CONFIG_DIR` and `SCHEDULER_CONFIG_FILE`
    /// are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_env = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_env.is_some() {
            return Err(ConfigError::ConflictingSources {
                dir_var: CONFIG_DIR_ENV,
                file_var: CONFIG_FILE_ENV,
            });
        }

        Ok(Self {
            config_dir: config_dir_env
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load a single file instead of the layered directory.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment read from `SCHEDULER_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` is not found (when using layered loading)
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config
            .try_deserialize()
            .map_err(|source| ConfigError::Deserialize { source })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder)?
        };

        let builder = Self::add_legacy_overrides(builder)?;

        // SCHEDULER_SERVER__PORT -> server.port
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self.config_dir.join(self.environment.overlay_file());
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    /// Apply `LEGACY_ENV_OVERRIDES` as explicit overrides.
    ///
    /// `config` sources cannot be ranked below the prefixed environment
    /// source, so a legacy variable is skipped whenever its prefixed
    /// counterpart is present.
    fn add_legacy_overrides(
        mut builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        for (legacy, key) in LEGACY_ENV_OVERRIDES {
            if std::env::var_os(prefixed_env_name(key)).is_some() {
                continue;
            }
            let value = std::env::var(legacy)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }
        Ok(builder)
    }

    /// Environment variables with prefix `SCHEDULER_` are mapped to configuration keys.
    /// Double underscores (`__`) separate nested keys.
    ///
    /// Examples:
    /// - `SCHEDULER_SERVER__PORT` -> `server.port`
    /// - `SCHEDULER_PLATFORMS__TWITCH__CLIENT_ID` -> `platforms.twitch.client_id`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

fn prefixed_env_name(key: &str) -> String {
    format!(
        "{}_{}",
        ENV_PREFIX,
        key.replace('.', ENV_SEPARATOR).to_uppercase()
    )
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}
