//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.
//!
//! Missing platform credentials are not checked here; they surface as a
//! per-platform authentication error at aggregation time.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DirectoryConfig, FileSettings, HttpClientConfig, LoggerSettings, ServerConfig, Settings,
    TwitchConfig, YoutubeConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn validate_base_url(field: &str, url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    let has_host = url
        .split_once("://")
        .map(|(_, rest)| !rest.is_empty())
        .unwrap_or(false);

    if !has_scheme || !has_host {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("'{}' is not an http(s) URL", url),
        });
    }
    Ok(())
}

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - Every CORS origin must be an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        for origin in &self.cors_allowed_origins {
            validate_base_url("server.cors_allowed_origins", origin)?;
        }

        Ok(())
    }
}

impl HttpClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "http.request_timeout",
                "Outbound request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl YoutubeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("platforms.youtube.api_base_url", &self.api_base_url)?;
        validate_base_url("platforms.youtube.watch_base_url", &self.watch_base_url)?;

        if !(1..=50).contains(&self.search_max_results) {
            return Err(ConfigError::validation(
                "platforms.youtube.search_max_results",
                "Search max results must be between 1 and 50.",
            ));
        }

        Ok(())
    }
}

impl TwitchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("platforms.twitch.api_base_url", &self.api_base_url)?;
        validate_base_url("platforms.twitch.auth_base_url", &self.auth_base_url)?;
        validate_base_url("platforms.twitch.watch_base_url", &self.watch_base_url)?;

        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(ConfigError::validation(
                "platforms.twitch.thumbnail_width",
                "Thumbnail dimensions must be greater than 0.",
            ));
        }

        if !(1..=100).contains(&self.max_results) {
            return Err(ConfigError::validation(
                "platforms.twitch.max_results",
                "Max results must be between 1 and 100.",
            ));
        }

        Ok(())
    }
}

impl DirectoryConfig {
    /// Every registered channel needs a non-empty id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (viewer_id, channels) in &self.viewers {
            if viewer_id.trim().is_empty() {
                return Err(ConfigError::validation(
                    "directory.viewers",
                    "Viewer ids must not be empty.",
                ));
            }

            if let Some(pos) = channels.iter().position(|c| c.channel_id.trim().is_empty()) {
                return Err(ConfigError::ValidationError {
                    field: format!("directory.viewers.{}", viewer_id),
                    message: format!("Channel #{} has an empty channel_id.", pos + 1),
                });
            }
        }
        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.http.validate()?;
        self.platforms.youtube.validate()?;
        self.platforms.twitch.validate()?;
        self.directory.validate()?;
        Ok(())
    }
}
