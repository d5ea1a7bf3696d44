//! # Authentication Middleware
//!
//! Resolves the organization (MSP ID) each request acts as.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {orgMspId}:{secret}
//! ```
//!
//! The secret is compared in constant time against the configured
//! `AUTH_TOKEN`. The organization part becomes the caller identity that the
//! verifier policy is evaluated against.
//!
//! When no token is configured (development mode) every request acts as the
//! gateway's own organization, `TCN_ORG_MSPID`.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Secret ──────────────────────────────────────────────────────────────────

/// Bearer secret. `Debug` never prints the value.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Organization the authenticated caller acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub org_msp_id: String,
}

impl CallerIdentity {
    /// Name recorded as `VerifiedBy` when the request does not supply one:
    /// the MSP ID without its `MSP` suffix (`Org1MSP` → `Org1`).
    pub fn organization_name(&self) -> &str {
        self.org_msp_id
            .strip_suffix("MSP")
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.org_msp_id)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: Option<SecretToken>,
    /// Identity used for every request when `token` is `None`.
    pub default_org: String,
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse `{orgMspId}:{secret}`. The secret may itself contain `:`.
pub fn parse_bearer_token(
    provided: &str,
    expected_secret: &SecretToken,
) -> Result<CallerIdentity, String> {
    let Some((org, secret)) = provided.split_once(':') else {
        return Err("invalid token format, expected {orgMspId}:{secret}".into());
    };
    if !constant_time_token_eq(secret, expected_secret.expose()) {
        return Err("invalid bearer token".into());
    }
    let org = org.trim();
    if org.is_empty() {
        return Err("token carries an empty organization".into());
    }
    Ok(CallerIdentity {
        org_msp_id: org.to_string(),
    })
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the bearer token and inject a [`CallerIdentity`].
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        tracing::error!("auth middleware mounted without AuthConfig");
        return AppError::Internal("authentication not configured".into()).into_response();
    };

    let Some(expected) = config.token else {
        request.extensions_mut().insert(CallerIdentity {
            org_msp_id: config.default_org,
        });
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            match parse_bearer_token(&value["Bearer ".len()..], &expected) {
                Ok(identity) => {
                    tracing::debug!(org = %identity.org_msp_id, "caller authenticated");
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    unauthorized_response(&msg)
                }
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
