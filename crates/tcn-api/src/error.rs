//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry errors to HTTP status codes and a JSON error body with a
//! machine-readable code. Internal and ledger error details are logged, never
//! returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tcn_registry::CredentialError;
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "TYPE_MISMATCH").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Credential does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Credential ID already taken (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored variant differs from the one requested (409).
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Stored variant is not one the registry knows (422).
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// Request content failed validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated caller lacks the required role (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// Ledger substrate failed (502). Message is logged but not returned.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Optional component not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    pub(crate) fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            Self::TypeMismatch(_) => (StatusCode::CONFLICT, "TYPE_MISMATCH"),
            Self::UnknownVariant(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_VARIANT"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Ledger(_) => (StatusCode::BAD_GATEWAY, "LEDGER_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    /// Machine-readable code, also used as the outcome label in metrics.
    pub fn code(&self) -> &'static str {
        self.status_and_code().1
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Ledger(_) => "The ledger could not complete the request".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Ledger(_) => tracing::error!(error = %self, "ledger error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NotFound(_) => Self::NotFound(err.to_string()),
            CredentialError::AlreadyExists(_) => Self::Conflict(err.to_string()),
            CredentialError::TypeMismatch { .. } => Self::TypeMismatch(err.to_string()),
            CredentialError::UnknownVariant(_) => Self::UnknownVariant(err.to_string()),
            CredentialError::InvalidArgument(_) => Self::Validation(err.to_string()),
            CredentialError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            CredentialError::Deserialization(_) | CredentialError::Serialization(_) => {
                Self::Internal(err.to_string())
            }
            CredentialError::Substrate(_) => Self::Ledger(err.to_string()),
        }
    }
}

impl From<tcn_core::ValidationError> for AppError {
    fn from(err: tcn_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tcn_core::CredentialType;
    use tcn_ledger::LedgerError;

    #[test]
    fn registry_errors_map_to_statuses() {
        let cases: Vec<(CredentialError, StatusCode, &str)> = vec![
            (
                CredentialError::NotFound("c1".into()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                CredentialError::AlreadyExists("c1".into()),
                StatusCode::CONFLICT,
                "ALREADY_EXISTS",
            ),
            (
                CredentialError::TypeMismatch {
                    expected: CredentialType::Academic,
                    found: CredentialType::Professional,
                },
                StatusCode::CONFLICT,
                "TYPE_MISMATCH",
            ),
            (
                CredentialError::UnknownVariant("badge".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_VARIANT",
            ),
            (
                CredentialError::Unauthorized {
                    caller: "Org2MSP".into(),
                },
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (
                CredentialError::Substrate(LedgerError::Unavailable("down".into())),
                StatusCode::BAD_GATEWAY,
                "LEDGER_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let app = AppError::from(err);
            assert_eq!(app.status_and_code(), (status, code));
        }
    }

    #[test]
    fn validation_error_from_tcn_core() {
        let core_err = tcn_core::ValidationError::UnknownStatus("approved".into());
        match AppError::from(core_err) {
            AppError::Validation(msg) => assert!(msg.contains("approved"), "got: {msg}"),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn error_body_skips_absent_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(!json.contains("details"));
    }

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found_keeps_message() {
        let (status, body) = response_parts(AppError::from(CredentialError::NotFound(
            "credential9".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("credential9"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("expected value at line 1".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_ledger_hides_details() {
        let (status, body) = response_parts(AppError::Ledger("peer0 timeout".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.error.message.contains("peer0"));
    }
}
