use axum::extract::rejection::QueryRejection;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::external::broadcast::Platform;
use crate::repositories::DirectoryError;

/// Application-wide error type that represents all possible errors in the system.
///
/// Platform clients report their failures through the `PlatformAuth`,
/// `Upstream` and `Decode` variants; the aggregation engine propagates them
/// unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation errors collected from a `validator::Validate` derive
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Channel directory lookup failed for a viewer
    #[error("Channel directory lookup failed for viewer '{viewer_id}'")]
    Directory {
        viewer_id: String,
        #[source]
        source: DirectoryError,
    },

    /// Platform credentials are missing or were rejected
    #[error("{platform} authentication error: {message}")]
    PlatformAuth { platform: Platform, message: String },

    /// Non-success response, transport failure, or failed token exchange
    #[error("{platform} upstream error: {message}")]
    Upstream {
        platform: Platform,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Provider response did not match the expected schema
    #[error("{platform} decode error: {message}")]
    Decode {
        platform: Platform,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// Stable error classes surfaced to callers and in partial reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Directory,
    Auth,
    Upstream,
    Decode,
    Configuration,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Directory => "directory",
            ErrorKind::Auth => "auth",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Decode => "decode",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field failure from request validation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl AppError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationErrors { .. } | AppError::BadRequest { .. } => {
                ErrorKind::Validation
            }
            AppError::Directory { .. } => ErrorKind::Directory,
            AppError::PlatformAuth { .. } => ErrorKind::Auth,
            AppError::Upstream { .. } => ErrorKind::Upstream,
            AppError::Decode { .. } => ErrorKind::Decode,
            AppError::Configuration { .. } => ErrorKind::Configuration,
            AppError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// The platform this error originated from, if any.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            AppError::PlatformAuth { platform, .. }
            | AppError::Upstream { platform, .. }
            | AppError::Decode { platform, .. } => Some(*platform),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = match &error {
            crate::config::error::ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationFieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: fields }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_platform_errors() {
        let auth = AppError::PlatformAuth {
            platform: Platform::Twitch,
            message: "missing client id".into(),
        };
        assert_eq!(auth.kind(), ErrorKind::Auth);
        assert_eq!(auth.platform(), Some(Platform::Twitch));

        let upstream = AppError::Upstream {
            platform: Platform::Youtube,
            status: Some(403),
            message: "forbidden".into(),
            source: None,
        };
        assert_eq!(upstream.kind(), ErrorKind::Upstream);

        let decode = AppError::Decode {
            platform: Platform::Youtube,
            message: "bad body".into(),
            source: None,
        };
        assert_eq!(decode.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_directory_error_has_no_platform() {
        let err = AppError::Directory {
            viewer_id: "viewer-1".into(),
            source: DirectoryError::NotFound {
                viewer_id: "viewer-1".into(),
            },
        };
        assert_eq!(err.kind(), ErrorKind::Directory);
        assert!(err.platform().is_none());
        assert!(err.to_string().contains("viewer-1"));
    }

    #[test]
    fn test_display_includes_platform_tag() {
        let err = AppError::PlatformAuth {
            platform: Platform::Youtube,
            message: "API key is not configured".into(),
        };
        assert_eq!(
            err.to_string(),
            "youtube authentication error: API key is not configured"
        );
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_request_errors_are_validation_kind() {
        let bad = AppError::BadRequest {
            message: "missing field `viewer_id`".into(),
        };
        assert_eq!(bad.kind(), ErrorKind::Validation);

        let invalid = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "viewer_id".into(),
                message: "too long".into(),
            }],
        };
        assert_eq!(invalid.kind(), ErrorKind::Validation);
        assert_eq!(invalid.to_string(), "Validation failed for 1 field(s)");
    }
}
