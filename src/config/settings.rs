//! Configuration settings structures for stream-scheduler
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::repositories::RegisteredChannel;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "stream-scheduler".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/stream-scheduler.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_http_request_timeout() -> u64 {
    10
}

fn default_http_connect_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("stream-scheduler/{}", crate::pkg_version())
}

fn default_youtube_api_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_youtube_watch_base_url() -> String {
    "https://www.youtube.com".to_string()
}

fn default_search_max_results() -> u32 {
    50
}

fn default_twitch_api_base_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

fn default_twitch_auth_base_url() -> String {
    "https://id.twitch.tv/oauth2".to_string()
}

fn default_twitch_watch_base_url() -> String {
    "https://www.twitch.tv".to_string()
}

fn default_thumbnail_width() -> u32 {
    480
}

fn default_thumbnail_height() -> u32 {
    270
}

fn default_twitch_max_results() -> u32 {
    100
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application metadata configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Inbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to an existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Outbound HTTP Configuration
// ============================================================================

/// Shared outbound HTTP client settings.
///
/// The request timeout is the only bound on how long a platform call may
/// block an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_http_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_http_connect_timeout")]
    pub connect_timeout: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_http_request_timeout(),
            connect_timeout: default_http_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Platform Configuration
// ============================================================================

/// YouTube Data API v3 settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// API key; empty means unconfigured
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_youtube_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_youtube_watch_base_url")]
    pub watch_base_url: String,

    /// `maxResults` for each per-channel search
    #[serde(default = "default_search_max_results")]
    pub search_max_results: u32,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_youtube_api_base_url(),
            watch_base_url: default_youtube_watch_base_url(),
            search_max_results: default_search_max_results(),
        }
    }
}

// Credentials never reach the logs.
impl std::fmt::Debug for YoutubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_base_url", &self.api_base_url)
            .field("watch_base_url", &self.watch_base_url)
            .field("search_max_results", &self.search_max_results)
            .finish()
    }
}

/// Twitch Helix settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_twitch_api_base_url")]
    pub api_base_url: String,

    /// OAuth2 endpoint base; the token is requested from `{auth_base_url}/token`
    #[serde(default = "default_twitch_auth_base_url")]
    pub auth_base_url: String,

    #[serde(default = "default_twitch_watch_base_url")]
    pub watch_base_url: String,

    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    #[serde(default = "default_thumbnail_height")]
    pub thumbnail_height: u32,

    /// `first` parameter of the streams query (Helix maximum is 100)
    #[serde(default = "default_twitch_max_results")]
    pub max_results: u32,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: default_twitch_api_base_url(),
            auth_base_url: default_twitch_auth_base_url(),
            watch_base_url: default_twitch_watch_base_url(),
            thumbnail_width: default_thumbnail_width(),
            thumbnail_height: default_thumbnail_height(),
            max_results: default_twitch_max_results(),
        }
    }
}

impl std::fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("api_base_url", &self.api_base_url)
            .field("auth_base_url", &self.auth_base_url)
            .field("watch_base_url", &self.watch_base_url)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("thumbnail_height", &self.thumbnail_height)
            .field("max_results", &self.max_results)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Per-platform settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlatformsConfig {
    #[serde(default)]
    pub youtube: YoutubeConfig,

    #[serde(default)]
    pub twitch: TwitchConfig,
}

// ============================================================================
// Channel Directory Configuration
// ============================================================================

/// Static viewer → channel registrations
///
/// ```toml
/// [[directory.viewers.demo]]
/// channel_id = "UC_x5XG1OV2P6uZZ5FSM9Ttw"
/// platform = "youtube"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub viewers: HashMap<String, Vec<RegisteredChannel>>,
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    /// Outbound HTTP client
    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub platforms: PlatformsConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,
}
