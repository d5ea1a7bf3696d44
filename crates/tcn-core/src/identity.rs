//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the two identifiers a credential carries.
//! You cannot pass a [`TalentId`] where a [`CredentialId`] is expected.
//!
//! ## Validation
//!
//! Both identifiers are free-form strings chosen by the issuer. The
//! constructors reject the empty string, leading or trailing whitespace,
//! strings longer than [`MAX_IDENTIFIER_LEN`] bytes, and control characters.
//! Input is never rewritten: the key a caller names is the key stored.
//! A `CredentialId` is also the ledger key, so the same rules keep the key
//! space printable.
//!
//! New credentials additionally may not take an id from
//! [`RESERVED_CREDENTIAL_IDS`]. Those names are fixed path segments of the
//! HTTP gateway (`/credentials/all`, `/credentials/academic`, ...) and a
//! record stored under one could never be addressed by id.
//!
//! Validation applies to caller input only. Deserialization accepts any
//! string, so records already on the ledger decode as they were written.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum identifier length in bytes.
pub const MAX_IDENTIFIER_LEN: usize = 256;

/// Credential ids that collide with static gateway routes.
pub const RESERVED_CREDENTIAL_IDS: [&str; 3] = ["academic", "professional", "all"];

fn validate_identifier(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyIdentifier { field });
    }
    if raw.trim() != raw {
        return Err(ValidationError::SurroundingWhitespace { field });
    }
    if raw.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::IdentifierTooLong {
            field,
            max: MAX_IDENTIFIER_LEN,
            len: raw.len(),
        });
    }
    if raw.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacter { field });
    }
    Ok(raw.to_string())
}

/// Globally unique identifier of a credential record; also its ledger key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(String);

impl CredentialId {
    /// Validate and wrap a credential identifier.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ValidationError> {
        validate_identifier("credential id", id.as_ref()).map(Self)
    }

    /// Validate an identifier for a credential about to be created. On top
    /// of [`CredentialId::new`], refuses [`RESERVED_CREDENTIAL_IDS`].
    pub fn for_issuance(id: impl AsRef<str>) -> Result<Self, ValidationError> {
        let id = Self::new(id)?;
        if RESERVED_CREDENTIAL_IDS.contains(&id.as_str()) {
            return Err(ValidationError::ReservedIdentifier(id.0));
        }
        Ok(id)
    }

    /// The identifier as stored on the ledger.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CredentialId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CredentialId> for String {
    fn from(id: CredentialId) -> Self {
        id.0
    }
}

impl AsRef<str> for CredentialId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the subject (the talent) a credential is about.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TalentId(String);

impl TalentId {
    /// Validate and wrap a talent identifier.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ValidationError> {
        validate_identifier("talent id", id.as_ref()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TalentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TalentId> for String {
    fn from(id: TalentId) -> Self {
        id.0
    }
}

impl AsRef<str> for TalentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TalentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
