//! Error handler for converting AppError to HTTP responses.
//!
//! `IntoResponse for AppError` produces the JSON `ErrorResponse` body;
//! `error_response_middleware` stamps the request id onto every error body
//! and rewrites axum's plain-text rejections (unknown route, wrong method)
//! into the same format.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;
use crate::repositories::DirectoryError;

/// Error bodies larger than this are passed through untouched.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - ValidationErrors / BadRequest → 400 BAD_REQUEST
    /// - Directory (viewer not registered) → 404 NOT_FOUND
    /// - Directory (backend unavailable) → 503 SERVICE_UNAVAILABLE
    /// - PlatformAuth → 500 INTERNAL_SERVER_ERROR
    /// - Upstream / Decode → 502 BAD_GATEWAY
    /// - Configuration / Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let (status, error_response) = error_parts(&self);

        if status.is_server_error() {
            tracing::error!(error = %self, kind = %self.kind(), "Request failed");
        } else {
            tracing::warn!(error = %self, kind = %self.kind(), "Request rejected");
        }

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError to its status code and response body.
fn error_parts(error: &AppError) -> (StatusCode, ErrorResponse) {
    match error {
        AppError::ValidationErrors { errors } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                .with_details(json!({ "errors": errors })),
        ),
        AppError::BadRequest { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_REQUEST", message),
        ),
        AppError::Directory { viewer_id, source } => match source {
            DirectoryError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("DIRECTORY_NOT_FOUND", &source.to_string())
                    .with_details(json!({ "viewer_id": viewer_id })),
            ),
            DirectoryError::Unavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("DIRECTORY_UNAVAILABLE", "Channel directory is unavailable")
                    .with_details(json!({ "viewer_id": viewer_id })),
            ),
        },
        AppError::PlatformAuth { platform, message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("PLATFORM_AUTH_ERROR", message)
                .with_details(json!({ "platform": platform })),
        ),
        AppError::Upstream {
            platform,
            status,
            message,
            ..
        } => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new("UPSTREAM_ERROR", message).with_details(json!({
                "platform": platform,
                "status": status,
            })),
        ),
        AppError::Decode {
            platform, message, ..
        } => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new("DECODE_ERROR", message)
                .with_details(json!({ "platform": platform })),
        ),
        AppError::Configuration { key, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
                .with_details(json!({ "key": key })),
        ),
        AppError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
        ),
    }
}

/// Normalizes every 4xx/5xx response into an `ErrorResponse` carrying the
/// request id.
///
/// Must run inside `request_id_middleware` so the id is in the extensions.
pub async fn error_response_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    let mut error_response = if is_json {
        match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(parsed) => parsed,
            Err(_) => return Response::from_parts(parts, Body::from(bytes)),
        }
    } else {
        fallback_response(status, String::from_utf8_lossy(&bytes).trim())
    };

    if error_response.request_id.is_none()
        && let Some(id) = request_id.as_deref()
    {
        error_response = error_response.with_request_id(id);
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    (parts, Json(error_response)).into_response()
}

/// Builds an `ErrorResponse` for a response that did not come from `AppError`.
fn fallback_response(status: StatusCode, original_message: &str) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => (
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::SERVICE_UNAVAILABLE => ("SERVICE_UNAVAILABLE", "Service temporarily unavailable"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    if original_message.is_empty() {
        ErrorResponse::new(code, default_message)
    } else {
        ErrorResponse::new(code, original_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::broadcast::Platform;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_directory_status_codes() {
        let not_found = AppError::Directory {
            viewer_id: "ghost".into(),
            source: DirectoryError::NotFound {
                viewer_id: "ghost".into(),
            },
        };
        assert_eq!(status_of(not_found), StatusCode::NOT_FOUND);

        let unavailable = AppError::Directory {
            viewer_id: "viewer-1".into(),
            source: DirectoryError::Unavailable {
                message: "connection refused".into(),
            },
        };
        assert_eq!(status_of(unavailable), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_platform_status_codes() {
        let auth = AppError::PlatformAuth {
            platform: Platform::Twitch,
            message: "client id/secret are not configured".into(),
        };
        assert_eq!(status_of(auth), StatusCode::INTERNAL_SERVER_ERROR);

        let upstream = AppError::Upstream {
            platform: Platform::Youtube,
            status: Some(403),
            message: "quota exceeded".into(),
            source: None,
        };
        assert_eq!(status_of(upstream), StatusCode::BAD_GATEWAY);

        let decode = AppError::Decode {
            platform: Platform::Youtube,
            message: "missing field `items`".into(),
            source: None,
        };
        assert_eq!(status_of(decode), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_status_code() {
        let err = AppError::BadRequest {
            message: "missing viewer_id".into(),
        };
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_error_is_sanitized() {
        let err = AppError::Internal {
            source: anyhow::anyhow!("secret connection string leaked"),
        };
        let body = body_json(err.into_response()).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn test_upstream_details_carry_platform_and_status() {
        let err = AppError::Upstream {
            platform: Platform::Twitch,
            status: Some(401),
            message: "token rejected".into(),
            source: None,
        };
        let body = body_json(err.into_response()).await;
        assert_eq!(body["details"]["platform"], "twitch");
        assert_eq!(body["details"]["status"], 401);
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/fail",
                get(|| async {
                    Err::<(), _>(AppError::BadRequest {
                        message: "bad".into(),
                    })
                }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(middleware::from_fn(error_response_middleware))
            .layer(middleware::from_fn(super::super::request_id_middleware))
    }

    #[tokio::test]
    async fn test_middleware_adds_request_id_to_app_errors() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/fail")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["request_id"], "req-42");
    }

    #[tokio::test]
    async fn test_middleware_converts_unknown_route() {
        let response = app()
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_middleware_leaves_success_untouched() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"fine");
    }
}
