//! # Error Types
//!
//! Leaf-level errors shared by the credential crates. All errors derive
//! `Display` and `Error` through `thiserror`; higher layers wrap them with
//! `#[from]` instead of stringly re-formatting.

use thiserror::Error;

/// Error during canonical serialization of a ledger record.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical record bytes.
    #[error("float values are not permitted in canonical records: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Input that does not satisfy a domain primitive's constructor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is empty.
    #[error("{field} must not be empty")]
    EmptyIdentifier {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Identifier starts or ends with whitespace.
    #[error("{field} must not start or end with whitespace")]
    SurroundingWhitespace {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Identifier exceeds the maximum length.
    #[error("{field} must not exceed {max} bytes, got {len}")]
    IdentifierTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted length in bytes.
        max: usize,
        /// Actual length in bytes.
        len: usize,
    },

    /// Identifier contains a control character.
    #[error("{field} must not contain control characters")]
    ControlCharacter {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Credential id names a fixed gateway route.
    #[error("credential id '{0}' is reserved")]
    ReservedIdentifier(String),

    /// Verification status string is not one of the recognized values.
    #[error("unknown verification status '{0}' (expected Pending, Verified or Revoked)")]
    UnknownStatus(String),

    /// Credential type string is not one of the recognized values.
    #[error("unknown credential type '{0}' (expected academic or professional)")]
    UnknownCredentialType(String),
}
