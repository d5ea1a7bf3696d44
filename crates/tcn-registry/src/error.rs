//! Registry error taxonomy.

use tcn_core::{CanonicalizationError, CredentialType, ValidationError};
use tcn_ledger::LedgerError;
use tcn_vc::CodecError;
use thiserror::Error;

/// Failure of a credential service operation.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("the credential {0} does not exist")]
    NotFound(String),

    #[error("the credential {0} already exists")]
    AlreadyExists(String),

    #[error("the credential is not of type {expected} but {found}")]
    TypeMismatch {
        expected: CredentialType,
        found: CredentialType,
    },

    #[error("unknown credential type: {0}")]
    UnknownVariant(String),

    /// Stored bytes could not be decoded.
    #[error("failed to decode stored credential: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Record could not be encoded for writing.
    #[error("failed to encode credential: {0}")]
    Serialization(#[source] CanonicalizationError),

    #[error("caller '{caller}' is not authorized to change verification status")]
    Unauthorized { caller: String },

    /// Caller-supplied argument failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// Opaque ledger failure.
    #[error("ledger error: {0}")]
    Substrate(#[from] LedgerError),
}

impl From<CodecError> for CredentialError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Deserialization(e) => Self::Deserialization(e),
            CodecError::TypeMismatch { expected, found } => Self::TypeMismatch { expected, found },
            CodecError::UnknownVariant(t) => Self::UnknownVariant(t),
            CodecError::Serialization(e) => Self::Serialization(e),
        }
    }
}
