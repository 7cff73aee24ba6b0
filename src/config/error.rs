//! Errors raised while locating, merging, and validating settings

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file (`--config`, `SCHEDULER_CONFIG_FILE`)
    /// does not exist
    #[error("configuration file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The merged layers do not fit the `Settings` shape
    #[error("configuration does not match the expected schema: {source}")]
    Deserialize {
        #[source]
        source: config::ConfigError,
    },

    /// A setting is present but outside its allowed range or format
    #[error("invalid value for {field}: {message}")]
    ValidationError {
        /// Dotted path of the offending key
        field: String,
        message: String,
    },

    #[error(
        "unknown environment '{value}' (expected development, test, staging or production)"
    )]
    UnknownEnvironment { value: String },

    /// Layered and single-file configuration were both requested
    #[error("{dir_var} and {file_var} cannot both be set; use one or the other")]
    ConflictingSources {
        dir_var: &'static str,
        file_var: &'static str,
    },

    /// Failure inside the `config` crate while collecting sources
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The dotted key this error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::ValidationError { field, .. } => Some(field),
            _ => None,
        }
    }
}
