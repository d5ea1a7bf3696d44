//! # Credential codec
//!
//! Bytes on the ledger are untyped. The codec recovers the variant by
//! decoding the shared-field view first and reading `CredentialType`, then
//! decoding the full record as that variant.

use serde::Serialize;
use tcn_core::{CanonicalBytes, CanonicalizationError, CredentialType};
use thiserror::Error;

use crate::credential::{
    AcademicCredential, BaseCredential, Credential, CredentialVariant, ProfessionalCredential,
    TalentCredential,
};

/// Codec failures.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Bytes are not a well-formed record of the requested shape.
    #[error("failed to decode credential record: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Stored discriminator differs from the one the caller asked for.
    #[error("the credential is not of type {expected} but {found}")]
    TypeMismatch {
        expected: CredentialType,
        found: CredentialType,
    },

    /// Stored discriminator names no known variant.
    #[error("unknown credential type: {0}")]
    UnknownVariant(String),

    /// Canonical encoding failed.
    #[error("failed to encode credential record: {0}")]
    Serialization(#[from] CanonicalizationError),
}

/// Stateless encoder/decoder between credential variants and ledger bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialCodec;

impl CredentialCodec {
    /// Encode a credential into canonical JSON bytes.
    ///
    /// The stored discriminator must agree with the variant being written;
    /// a disagreement is reported as `TypeMismatch` rather than persisted.
    pub fn encode<C>(credential: &C) -> Result<Vec<u8>, CodecError>
    where
        C: Credential + Serialize,
    {
        let declared = &credential.base().credential_type;
        let actual = credential.variant_type();
        if *declared != actual {
            return Err(CodecError::TypeMismatch {
                expected: actual,
                found: declared.clone(),
            });
        }
        Ok(CanonicalBytes::new(credential)?.into_vec())
    }

    /// Decode only the shared fields.
    pub fn decode_base(bytes: &[u8]) -> Result<BaseCredential, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Deserialization)
    }

    /// Decode as a statically chosen variant.
    pub fn decode_as<T: CredentialVariant>(bytes: &[u8]) -> Result<T, CodecError> {
        let base = Self::decode_base(bytes)?;
        let expected = T::kind();
        if base.credential_type != expected {
            return Err(CodecError::TypeMismatch {
                expected,
                found: base.credential_type,
            });
        }
        serde_json::from_slice(bytes).map_err(CodecError::Deserialization)
    }

    pub fn decode_academic(bytes: &[u8]) -> Result<AcademicCredential, CodecError> {
        Self::decode_as(bytes)
    }

    pub fn decode_professional(bytes: &[u8]) -> Result<ProfessionalCredential, CodecError> {
        Self::decode_as(bytes)
    }

    /// Decode as the variant named by `expected`.
    ///
    /// `expected` must itself be a recognized type; asking for an
    /// unrecognized one is `UnknownVariant`.
    pub fn decode_variant(
        bytes: &[u8],
        expected: &CredentialType,
    ) -> Result<TalentCredential, CodecError> {
        match expected {
            CredentialType::Academic => Self::decode_academic(bytes).map(TalentCredential::from),
            CredentialType::Professional => {
                Self::decode_professional(bytes).map(TalentCredential::from)
            }
            CredentialType::Unrecognized(raw) => Err(CodecError::UnknownVariant(raw.clone())),
        }
    }

    /// Decode as whatever variant the record declares.
    pub fn decode_any(bytes: &[u8]) -> Result<TalentCredential, CodecError> {
        let base = Self::decode_base(bytes)?;
        Self::decode_variant(bytes, &base.credential_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcn_core::{CredentialId, TalentId, VerificationStatus};

    fn academic() -> AcademicCredential {
        AcademicCredential::new(
            CredentialId::new("c1").unwrap(),
            TalentId::new("t1").unwrap(),
            "Ann",
            "Lee",
            "Go",
            "BSc CS",
            "X Univ",
        )
    }

    fn professional() -> ProfessionalCredential {
        ProfessionalCredential::new(
            CredentialId::new("c2").unwrap(),
            TalentId::new("t2").unwrap(),
            "Bob",
            "Johnson",
            "Project Management, Leadership",
            "5 years as Project Manager",
            "Company ABCDEF",
        )
    }

    #[test]
    fn encode_is_canonical() {
        let bytes = CredentialCodec::encode(&academic()).unwrap();
        let s = std::str::from_utf8(&bytes).unwrap();
        assert!(s.starts_with(r#"{"CredentialID":"c1","CredentialType":"academic","Education""#));
        assert!(s.ends_with(r#""VerificationStatus":"Pending","VerifiedBy":""}"#));
        assert_eq!(bytes, CredentialCodec::encode(&academic()).unwrap());
    }

    #[test]
    fn encode_through_union_matches_variant() {
        let direct = CredentialCodec::encode(&professional()).unwrap();
        let wrapped = CredentialCodec::encode(&TalentCredential::from(professional())).unwrap();
        assert_eq!(direct, wrapped);
    }

    #[test]
    fn encode_rejects_inconsistent_discriminator() {
        let mut c = academic();
        c.base.credential_type = CredentialType::Professional;
        assert!(matches!(
            CredentialCodec::encode(&c),
            Err(CodecError::TypeMismatch {
                expected: CredentialType::Academic,
                found: CredentialType::Professional,
            })
        ));
    }

    #[test]
    fn decode_base_reads_shared_fields_of_either_variant() {
        let bytes = CredentialCodec::encode(&professional()).unwrap();
        let base = CredentialCodec::decode_base(&bytes).unwrap();
        assert_eq!(base, professional().base);
    }

    #[test]
    fn decode_base_rejects_garbage() {
        assert!(matches!(
            CredentialCodec::decode_base(b"not json"),
            Err(CodecError::Deserialization(_))
        ));
        assert!(matches!(
            CredentialCodec::decode_base(br#"{"CredentialID":"c1"}"#),
            Err(CodecError::Deserialization(_))
        ));
    }

    #[test]
    fn decode_variant_reports_type_mismatch() {
        let bytes = CredentialCodec::encode(&professional()).unwrap();
        let err = CredentialCodec::decode_variant(&bytes, &CredentialType::Academic).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the credential is not of type academic but professional"
        );
    }

    #[test]
    fn decode_variant_reports_missing_variant_fields_as_deserialization() {
        let mut value = serde_json::to_value(academic()).unwrap();
        value.as_object_mut().unwrap().remove("Institution");
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            CredentialCodec::decode_academic(&bytes),
            Err(CodecError::Deserialization(_))
        ));
    }

    #[test]
    fn decode_any_dispatches_on_discriminator() {
        let a = CredentialCodec::encode(&academic()).unwrap();
        let p = CredentialCodec::encode(&professional()).unwrap();
        assert_eq!(
            CredentialCodec::decode_any(&a).unwrap(),
            TalentCredential::Academic(academic())
        );
        assert_eq!(
            CredentialCodec::decode_any(&p).unwrap(),
            TalentCredential::Professional(professional())
        );
    }

    #[test]
    fn decode_any_reports_unknown_variant() {
        let mut value = serde_json::to_value(academic().base).unwrap();
        value["CredentialType"] = "certificate".into();
        let bytes = serde_json::to_vec(&value).unwrap();

        let base = CredentialCodec::decode_base(&bytes).unwrap();
        assert_eq!(
            base.credential_type,
            CredentialType::Unrecognized("certificate".into())
        );
        match CredentialCodec::decode_any(&bytes) {
            Err(CodecError::UnknownVariant(t)) => assert_eq!(t, "certificate"),
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn status_change_survives_round_trip() {
        let mut c = academic();
        c.set_verification(VerificationStatus::Revoked, "Org1");
        let back = CredentialCodec::decode_academic(&CredentialCodec::encode(&c).unwrap()).unwrap();
        assert_eq!(back.base.verification_status, VerificationStatus::Revoked);
        assert_eq!(back.base.verified_by, "Org1");
    }
}
