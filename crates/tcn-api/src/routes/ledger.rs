//! # Ledger Bootstrap Route
//!
//! - `POST /ledger/init` — Write the sample credentials, overwriting any
//!   records with the same IDs.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::AppError;
use crate::routes::credentials::observed;
use crate::routes::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ledger/init", post(init_ledger))
}

/// POST /ledger/init — Seed the sample credentials.
#[utoipa::path(
    post,
    path = "/ledger/init",
    responses(
        (status = 200, description = "Sample credentials written", body = ApiResponse),
        (status = 502, description = "Ledger failure", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn init_ledger(State(state): State<AppState>) -> Result<Json<ApiResponse>, AppError> {
    observed("init_ledger", move || {
        let written = state.service.init_ledger()?;
        let data = serde_json::to_value(&written).map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Json(ApiResponse::mutation(
            format!("Ledger initialized with {} credentials", written.len()),
            Some(data),
        )))
    })
    .await
}
