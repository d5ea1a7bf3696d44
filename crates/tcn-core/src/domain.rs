//! # Credential Domain Enums
//!
//! The discriminator that selects a credential variant and the verification
//! status every credential carries. The string forms are the ones persisted
//! on the ledger and must not change.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Discriminator stored in every credential record under `CredentialType`.
///
/// `Unrecognized` only ever appears when decoding the shared-field view of a
/// record written by some other writer. Encoders never produce it for the
/// two known variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CredentialType {
    Academic,
    Professional,
    Unrecognized(String),
}

impl CredentialType {
    /// Wire string for this discriminator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Academic => "academic",
            Self::Professional => "professional",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Whether this discriminator names a variant the codec can decode.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Parse a caller-supplied type name, rejecting anything unrecognized.
    pub fn parse_known(s: &str) -> Result<Self, ValidationError> {
        match Self::from(s.trim().to_ascii_lowercase()) {
            Self::Unrecognized(_) => Err(ValidationError::UnknownCredentialType(s.to_string())),
            known => Ok(known),
        }
    }
}

impl From<String> for CredentialType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "academic" => Self::Academic,
            "professional" => Self::Professional,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<CredentialType> for String {
    fn from(t: CredentialType) -> Self {
        match t {
            CredentialType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verification state of a credential.
///
/// Every credential starts `Pending`. Only the access-controlled verification
/// operation moves it to `Verified` or `Revoked`; there is no other
/// transition guard, so a revoked credential may be re-verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Revoked,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::Revoked => "Revoked",
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = ValidationError;

    /// Case-insensitive on input; the stored form is always capitalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "revoked" => Ok(Self::Revoked),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
