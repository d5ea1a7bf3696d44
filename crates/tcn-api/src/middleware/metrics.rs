//! # Request Metrics
//!
//! Records through the `metrics` facade. Nothing is exported unless the
//! binary installs a recorder (`metrics-exporter-prometheus`); without one
//! every macro is a no-op, which is what the tests run against.
//!
//! | Metric | Kind | Labels |
//! |---|---|---|
//! | `tcn_http_requests_total` | counter | method, path, status |
//! | `tcn_http_request_duration_seconds` | histogram | method, path |
//! | `tcn_credential_operations_total` | counter | operation, outcome |

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;

/// Count and time every request. The path label is the matched route
/// template, so `/credentials/{id}` is one series rather than one per ID.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "tcn_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "tcn_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Count one credential operation by outcome (`ok` or the error code).
pub fn record_operation<T>(operation: &'static str, result: &Result<T, AppError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.code(),
    };
    metrics::counter!(
        "tcn_credential_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
