//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Bearer token of the form `<orgMspId>:<secret>`. Set the secret via AUTH_TOKEN.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Talent Credentials Network API",
        version = "0.1.0",
        description = "Issue, verify, update and list academic and professional talent credentials held on a shared ledger.\n\nAuthentication: `Authorization: Bearer <orgMspId>:<secret>`. Health probes (`/health/*`) and `/metrics` are unauthenticated."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        crate::routes::credentials::create_academic,
        crate::routes::credentials::create_professional,
        crate::routes::credentials::get_credential,
        crate::routes::credentials::list_credentials,
        crate::routes::credentials::approve_credential,
        crate::routes::credentials::revoke_credential,
        crate::routes::credentials::update_skills,
        crate::routes::credentials::update_name,
        crate::routes::credentials::delete_credential,
        crate::routes::ledger::init_ledger,
    ),
    components(schemas(
        crate::routes::ApiResponse,
        crate::routes::credentials::CreateAcademicRequest,
        crate::routes::credentials::CreateProfessionalRequest,
        crate::routes::credentials::VerificationRequest,
        crate::routes::credentials::UpdateSkillsRequest,
        crate::routes::credentials::UpdateNameRequest,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "credentials", description = "Credential issuance, verification, mutation and listing"),
        (name = "ledger", description = "Ledger bootstrap"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
