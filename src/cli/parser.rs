//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Environment as AppEnvironment;

/// Merged YouTube and Twitch broadcast schedules
#[derive(Parser, Debug)]
#[command(name = "stream-scheduler")]
#[command(about = "Merged YouTube and Twitch broadcast schedules for a viewer's channels")]
#[command(long_about = "
stream-scheduler looks up the channels a viewer follows, queries YouTube and
Twitch concurrently, and returns one merged list of upcoming, live and ended
broadcasts. It runs as an HTTP API server or as a one-shot command.

EXAMPLES:
    # Start the server with default configuration
    stream-scheduler serve

    # Start server on custom host and port
    stream-scheduler serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    stream-scheduler --config /path/to/config.toml serve

    # Check configuration without starting server
    stream-scheduler serve --dry-run

    # Print one viewer's merged schedule
    stream-scheduler fetch viewer-1 --pretty

    # Keep platforms that succeeded when another one fails
    stream-scheduler fetch viewer-1 --partial
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// The file must exist and be readable.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `config/{environment}.toml` layer is loaded.
    ///
    /// Available values: development (dev), test, staging (stage), production (prod)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises log output to debug level. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers log output to error level. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   stream-scheduler serve                           # Start with defaults
    ///   stream-scheduler serve --host 0.0.0.0 --port 80 # Bind to all interfaces on port 80
    ///   stream-scheduler serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept connections
        /// from any interface.
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides both the configuration file and the global --verbose/--quiet flags.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Returns exit code 0 if valid, non-zero if invalid.
        #[arg(long)]
        dry_run: bool,
    },
    /// Aggregate one viewer's broadcasts and print them as JSON
    ///
    /// Examples:
    ///   stream-scheduler fetch viewer-1             # All-or-nothing, compact JSON
    ///   stream-scheduler fetch viewer-1 --partial   # Report per-platform failures
    Fetch {
        /// Viewer whose registered channels are queried
        #[arg(value_name = "VIEWER_ID", value_parser = super::validation::validate_viewer_id)]
        viewer_id: String,

        /// Keep successful platforms and list failed ones instead of failing
        #[arg(long)]
        partial: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for AppEnvironment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => AppEnvironment::Development,
            Environment::Test => AppEnvironment::Test,
            Environment::Staging => AppEnvironment::Staging,
            Environment::Production => AppEnvironment::Production,
        }
    }
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// The command to run; `serve` with no overrides when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
            log_level: None,
            dry_run: false,
        })
    }
}
