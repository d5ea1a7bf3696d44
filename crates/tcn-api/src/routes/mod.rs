//! # Route Modules
//!
//! - [`credentials`]: credential issuance, lookup, verification, mutation,
//!   deletion and listing.
//! - [`ledger`]: ledger bootstrap with the sample credentials.

pub mod credentials;
pub mod ledger;

use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope shared by every credential route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    /// Credential record(s) in their stored JSON layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    /// Present on mutations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl ApiResponse {
    pub fn read(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            transaction_id: None,
        }
    }

    pub fn mutation(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            transaction_id: Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}
