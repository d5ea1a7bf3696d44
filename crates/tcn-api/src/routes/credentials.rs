//! # Credential Routes
//!
//! REST surface over [`CredentialService`](tcn_registry::CredentialService).
//!
//! ## Endpoints
//!
//! - `POST   /credentials/academic`         — Issue an academic credential
//! - `POST   /credentials/professional`     — Issue a professional credential
//! - `GET    /credentials`                  — List credentials (`?talentId=` filters)
//! - `GET    /credentials/all`              — Same as `GET /credentials`
//! - `GET    /credentials/{id}`             — Read one (`?type=academic|professional|base`)
//! - `PUT    /credentials/{id}/approve`     — Mark verified (verifier organization only)
//! - `PUT    /credentials/{id}/revoke`      — Mark revoked (verifier organization only)
//! - `PUT    /credentials/{id}/skills`      — Replace skills
//! - `PUT    /credentials/{id}/name`        — Replace first and last name
//! - `DELETE /credentials/{id}`             — Delete permanently
//!
//! Handlers carry no business rules; they parse, delegate and wrap the
//! result in the [`ApiResponse`] envelope.
//!
//! `all`, `academic` and `professional` are static segments, so no credential
//! can be issued under those ids (see `tcn_core::RESERVED_CREDENTIAL_IDS`).
//! Handler bodies run through [`observed`] on Tokio's blocking pool.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tcn_core::{CredentialType, VerificationStatus};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{
    extract_json, extract_optional_json, extract_validated_json, require_non_blank, Validate,
};
use crate::middleware::metrics::record_operation;
use crate::routes::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request to issue an academic credential.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAcademicRequest {
    pub credential_id: String,
    pub talent_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub skills: String,
    pub education: String,
    pub institution: String,
}

impl Validate for CreateAcademicRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("credentialId", &self.credential_id)?;
        require_non_blank("talentId", &self.talent_id)
    }
}

/// Request to issue a professional credential.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProfessionalRequest {
    pub credential_id: String,
    pub talent_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub skills: String,
    pub work_experience: String,
    pub company: String,
}

impl Validate for CreateProfessionalRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("credentialId", &self.credential_id)?;
        require_non_blank("talentId", &self.talent_id)
    }
}

/// Optional body of approve/revoke.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerificationRequest {
    /// Recorded as `VerifiedBy`. Defaults to the caller's organization name.
    #[serde(default)]
    pub verified_by: Option<String>,
}

/// Request to replace a credential's skills.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSkillsRequest {
    pub new_skills: String,
}

/// Request to replace a credential holder's name.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateNameRequest {
    pub new_first_name: String,
    pub new_last_name: String,
}

impl Validate for UpdateNameRequest {
    fn validate(&self) -> Result<(), String> {
        if self.new_first_name.trim().is_empty() && self.new_last_name.trim().is_empty() {
            return Err("newFirstName and newLastName must not both be empty".into());
        }
        Ok(())
    }
}

/// Query of `GET /credentials/{id}`.
#[derive(Debug, Deserialize)]
pub struct GetQuery {
    /// `academic`, `professional` or `base`. Absent reads the stored variant.
    #[serde(rename = "type")]
    pub credential_type: Option<String>,
}

/// Query of `GET /credentials`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only credentials about this talent.
    pub talent_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/credentials", get(list_credentials))
        .route("/credentials/all", get(list_credentials))
        .route("/credentials/academic", post(create_academic))
        .route("/credentials/professional", post(create_professional))
        .route(
            "/credentials/{id}",
            get(get_credential).delete(delete_credential),
        )
        .route("/credentials/{id}/approve", put(approve_credential))
        .route("/credentials/{id}/revoke", put(revoke_credential))
        .route("/credentials/{id}/skills", put(update_skills))
        .route("/credentials/{id}/name", put(update_name))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_data<T: Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}

/// Run a handler body on the blocking pool and count its outcome. Ledger
/// calls may touch the snapshot file, so they stay off the async workers.
pub(crate) async fn observed<T, F>(operation: &'static str, body: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(body)
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(format!("{operation} task failed: {e}"))));
    record_operation(operation, &result);
    result
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /credentials/academic — Issue an academic credential.
#[utoipa::path(
    post,
    path = "/credentials/academic",
    request_body = CreateAcademicRequest,
    responses(
        (status = 201, description = "Credential created", body = ApiResponse),
        (status = 409, description = "Credential ID already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn create_academic(
    State(state): State<AppState>,
    body: Result<Json<CreateAcademicRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    observed("create_academic", move || {
        let req = extract_validated_json(body)?;
        let credential = state.service.create_academic(
            &req.credential_id,
            &req.talent_id,
            &req.first_name,
            &req.last_name,
            &req.skills,
            &req.education,
            &req.institution,
        )?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::mutation(
                "Academic credential created successfully",
                Some(to_data(&credential)?),
            )),
        ))
    })
    .await
}

/// POST /credentials/professional — Issue a professional credential.
#[utoipa::path(
    post,
    path = "/credentials/professional",
    request_body = CreateProfessionalRequest,
    responses(
        (status = 201, description = "Credential created", body = ApiResponse),
        (status = 409, description = "Credential ID already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn create_professional(
    State(state): State<AppState>,
    body: Result<Json<CreateProfessionalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    observed("create_professional", move || {
        let req = extract_validated_json(body)?;
        let credential = state.service.create_professional(
            &req.credential_id,
            &req.talent_id,
            &req.first_name,
            &req.last_name,
            &req.skills,
            &req.work_experience,
            &req.company,
        )?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::mutation(
                "Professional credential created successfully",
                Some(to_data(&credential)?),
            )),
        ))
    })
    .await
}

/// GET /credentials/{id} — Read one credential.
#[utoipa::path(
    get,
    path = "/credentials/{id}",
    params(
        ("id" = String, Path, description = "Credential ID"),
        ("type" = Option<String>, Query, description = "academic, professional or base"),
    ),
    responses(
        (status = 200, description = "Credential", body = ApiResponse),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
        (status = 409, description = "Stored variant differs from `type`", body = crate::error::ErrorBody),
        (status = 422, description = "Unrecognized stored or requested type", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn get_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<ApiResponse>, AppError> {
    observed("get_credential", move || {
        let data = match query.credential_type.as_deref().map(str::trim) {
            None | Some("") => to_data(&state.service.get_any(&id)?)?,
            Some(t) if t.eq_ignore_ascii_case("base") => to_data(&state.service.get_base(&id)?)?,
            Some(t) => match CredentialType::parse_known(t)? {
                CredentialType::Academic => to_data(&state.service.get_academic(&id)?)?,
                CredentialType::Professional => {
                    to_data(&state.service.get_professional(&id)?)?
                }
                CredentialType::Unrecognized(raw) => {
                    return Err(AppError::Validation(format!("unknown credential type '{raw}'")))
                }
            },
        };
        Ok(Json(ApiResponse::read("Credential retrieved successfully", data)))
    })
    .await
}

/// GET /credentials — List credentials in key order.
#[utoipa::path(
    get,
    path = "/credentials",
    params(("talentId" = Option<String>, Query, description = "Only credentials about this talent")),
    responses(
        (status = 200, description = "Credentials", body = ApiResponse),
        (status = 500, description = "A stored record could not be decoded", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn list_credentials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse>, AppError> {
    observed("list_credentials", move || {
        let listing = match query.talent_id.as_deref() {
            Some(talent) => state.service.list_by_talent(talent)?,
            None => state.service.list_all()?,
        };
        let message = format!("{} credential(s) retrieved successfully", listing.len());
        Ok(Json(ApiResponse::read(message, to_data(&listing)?)))
    })
    .await
}

fn set_status(
    state: &AppState,
    caller: &CallerIdentity,
    id: &str,
    status: VerificationStatus,
    body: &Bytes,
) -> Result<serde_json::Value, AppError> {
    let req: VerificationRequest = extract_optional_json(body)?;
    let verified_by = req
        .verified_by
        .unwrap_or_else(|| caller.organization_name().to_string());
    let updated = state.service.update_verification_status(
        id,
        status.as_str(),
        &verified_by,
        &caller.org_msp_id,
    )?;
    to_data(&updated)
}

/// PUT /credentials/{id}/approve — Mark a credential verified.
#[utoipa::path(
    put,
    path = "/credentials/{id}/approve",
    params(("id" = String, Path, description = "Credential ID")),
    request_body(content = VerificationRequest, description = "Optional verifier name"),
    responses(
        (status = 200, description = "Credential approved", body = ApiResponse),
        (status = 403, description = "Caller is not the verifying organization", body = crate::error::ErrorBody),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn approve_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: CallerIdentity,
    body: Bytes,
) -> Result<Json<ApiResponse>, AppError> {
    observed("approve_credential", move || {
        let data = set_status(&state, &caller, &id, VerificationStatus::Verified, &body)?;
        Ok(Json(ApiResponse::mutation(
            "Credential approved successfully",
            Some(data),
        )))
    })
    .await
}

/// PUT /credentials/{id}/revoke — Mark a credential revoked.
#[utoipa::path(
    put,
    path = "/credentials/{id}/revoke",
    params(("id" = String, Path, description = "Credential ID")),
    request_body(content = VerificationRequest, description = "Optional verifier name"),
    responses(
        (status = 200, description = "Credential revoked", body = ApiResponse),
        (status = 403, description = "Caller is not the verifying organization", body = crate::error::ErrorBody),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn revoke_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: CallerIdentity,
    body: Bytes,
) -> Result<Json<ApiResponse>, AppError> {
    observed("revoke_credential", move || {
        let data = set_status(&state, &caller, &id, VerificationStatus::Revoked, &body)?;
        Ok(Json(ApiResponse::mutation(
            "Credential revoked successfully",
            Some(data),
        )))
    })
    .await
}

/// PUT /credentials/{id}/skills — Replace skills.
#[utoipa::path(
    put,
    path = "/credentials/{id}/skills",
    params(("id" = String, Path, description = "Credential ID")),
    request_body = UpdateSkillsRequest,
    responses(
        (status = 200, description = "Skills updated", body = ApiResponse),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn update_skills(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSkillsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    observed("update_skills", move || {
        let req = extract_json(body)?;
        let updated = state.service.update_skills(&id, &req.new_skills)?;
        Ok(Json(ApiResponse::mutation(
            "Skills updated successfully",
            Some(to_data(&updated)?),
        )))
    })
    .await
}

/// PUT /credentials/{id}/name — Replace first and last name.
#[utoipa::path(
    put,
    path = "/credentials/{id}/name",
    params(("id" = String, Path, description = "Credential ID")),
    request_body = UpdateNameRequest,
    responses(
        (status = 200, description = "Name updated", body = ApiResponse),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn update_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateNameRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    observed("update_name", move || {
        let req = extract_validated_json(body)?;
        let updated = state
            .service
            .update_name(&id, &req.new_first_name, &req.new_last_name)?;
        Ok(Json(ApiResponse::mutation(
            "Name updated successfully",
            Some(to_data(&updated)?),
        )))
    })
    .await
}

/// DELETE /credentials/{id} — Delete permanently.
#[utoipa::path(
    delete,
    path = "/credentials/{id}",
    params(("id" = String, Path, description = "Credential ID")),
    responses(
        (status = 200, description = "Credential deleted", body = ApiResponse),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn delete_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, AppError> {
    observed("delete_credential", move || {
        state.service.delete(&id)?;
        Ok(Json(ApiResponse::mutation(
            format!("Credential {id} deleted successfully"),
            None,
        )))
    })
    .await
}
