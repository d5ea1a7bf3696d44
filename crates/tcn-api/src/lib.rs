//! # tcn-api — REST Gateway for the Talent Credentials Network
//!
//! Axum service exposing the credential registry over HTTP.
//!
//! ## Route Structure
//!
//! | Path | Module | Auth |
//! |---|---|---|
//! | `/credentials/*` | [`routes::credentials`] | bearer |
//! | `/ledger/init` | [`routes::ledger`] | bearer |
//! | `/openapi.json` | [`openapi`] | bearer |
//! | `/health/liveness`, `/health/readiness` | this module | none |
//! | `/metrics` | this module | none |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CORS → TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! The bearer token names the calling organization (`<orgMspId>:<secret>`).
//! That MSP ID is what the verifier policy checks on approve and revoke.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Identifier used by the readiness probe. Never written.
const READINESS_PROBE_KEY: &str = "readiness-probe";

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` sit outside the auth middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
        default_org: state.config.org_mspid.clone(),
    };

    // Body size limit: 1 MiB.
    let mut api = Router::new()
        .merge(routes::credentials::router())
        .merge(routes::ledger::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(from_fn(auth::auth_middleware));

    if state.config.metrics_enabled {
        api = api.layer(from_fn(middleware::metrics::metrics_middleware));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .layer(Extension(auth_config))
        .with_state(state.clone());

    let unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .route("/metrics", axum::routing::get(prometheus_metrics))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(unauthenticated)
        .merge(api)
        .layer(ServiceBuilder::new().layer(cors))
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" when the ledger answers a lookup, 503
/// otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.credential_exists(READINESS_PROBE_KEY) {
        Ok(_) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "ledger unavailable").into_response()
        }
    }
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics not enabled").into_response(),
    }
}
