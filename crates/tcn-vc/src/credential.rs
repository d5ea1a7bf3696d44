//! # Credential record model
//!
//! Persisted field names are PascalCase (`CredentialID`, `TalentID`,
//! `VerificationStatus`, ...) and must stay that way: they are the ledger
//! record layout.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tcn_core::{CredentialId, CredentialType, TalentId, VerificationStatus};

/// Fields present in every credential, whatever its variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseCredential {
    #[serde(rename = "CredentialID")]
    pub credential_id: CredentialId,
    /// Discriminator. Set once at creation.
    #[serde(rename = "CredentialType")]
    pub credential_type: CredentialType,
    #[serde(rename = "TalentID")]
    pub talent_id: TalentId,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    /// Free-form, typically a comma-separated list.
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "VerificationStatus")]
    pub verification_status: VerificationStatus,
    /// Empty until the first verification decision.
    #[serde(rename = "VerifiedBy")]
    pub verified_by: String,
}

impl BaseCredential {
    /// Shared fields of a freshly issued credential: `Pending`, no verifier.
    pub fn pending(
        credential_id: CredentialId,
        credential_type: CredentialType,
        talent_id: TalentId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        skills: impl Into<String>,
    ) -> Self {
        Self {
            credential_id,
            credential_type,
            talent_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            skills: skills.into(),
            verification_status: VerificationStatus::Pending,
            verified_by: String::new(),
        }
    }
}

/// Academic credential: a degree or diploma from an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicCredential {
    #[serde(flatten)]
    pub base: BaseCredential,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Institution")]
    pub institution: String,
}

impl AcademicCredential {
    pub fn new(
        credential_id: CredentialId,
        talent_id: TalentId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        skills: impl Into<String>,
        education: impl Into<String>,
        institution: impl Into<String>,
    ) -> Self {
        Self {
            base: BaseCredential::pending(
                credential_id,
                CredentialType::Academic,
                talent_id,
                first_name,
                last_name,
                skills,
            ),
            education: education.into(),
            institution: institution.into(),
        }
    }
}

/// Professional credential: work experience at a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalCredential {
    #[serde(flatten)]
    pub base: BaseCredential,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "WorkExperience")]
    pub work_experience: String,
}

impl ProfessionalCredential {
    pub fn new(
        credential_id: CredentialId,
        talent_id: TalentId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        skills: impl Into<String>,
        work_experience: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            base: BaseCredential::pending(
                credential_id,
                CredentialType::Professional,
                talent_id,
                first_name,
                last_name,
                skills,
            ),
            company: company.into(),
            work_experience: work_experience.into(),
        }
    }
}

/// Common accessors over anything that carries a [`BaseCredential`].
///
/// The mutators are the only in-place changes a stored credential admits.
pub trait Credential {
    fn base(&self) -> &BaseCredential;

    fn base_mut(&mut self) -> &mut BaseCredential;

    /// The variant this value actually is, independent of the stored
    /// discriminator field.
    fn variant_type(&self) -> CredentialType;

    fn credential_id(&self) -> &CredentialId {
        &self.base().credential_id
    }

    fn set_names(&mut self, first_name: impl Into<String>, last_name: impl Into<String>)
    where
        Self: Sized,
    {
        let base = self.base_mut();
        base.first_name = first_name.into();
        base.last_name = last_name.into();
    }

    fn set_skills(&mut self, skills: impl Into<String>)
    where
        Self: Sized,
    {
        self.base_mut().skills = skills.into();
    }

    /// Record a verification decision. Status and verifier always move
    /// together.
    fn set_verification(&mut self, status: VerificationStatus, verified_by: impl Into<String>)
    where
        Self: Sized,
    {
        let base = self.base_mut();
        base.verification_status = status;
        base.verified_by = verified_by.into();
    }
}

/// A concrete, decodable credential variant.
pub trait CredentialVariant: Credential + Serialize + DeserializeOwned {
    /// Discriminator value this variant is stored under.
    fn kind() -> CredentialType;

    fn into_talent_credential(self) -> TalentCredential;
}

impl Credential for AcademicCredential {
    fn base(&self) -> &BaseCredential {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseCredential {
        &mut self.base
    }

    fn variant_type(&self) -> CredentialType {
        CredentialType::Academic
    }
}

impl CredentialVariant for AcademicCredential {
    fn kind() -> CredentialType {
        CredentialType::Academic
    }

    fn into_talent_credential(self) -> TalentCredential {
        TalentCredential::Academic(self)
    }
}

impl Credential for ProfessionalCredential {
    fn base(&self) -> &BaseCredential {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseCredential {
        &mut self.base
    }

    fn variant_type(&self) -> CredentialType {
        CredentialType::Professional
    }
}

impl CredentialVariant for ProfessionalCredential {
    fn kind() -> CredentialType {
        CredentialType::Professional
    }

    fn into_talent_credential(self) -> TalentCredential {
        TalentCredential::Professional(self)
    }
}

/// A credential in its actual variant.
///
/// Serializes as the inner record, so the JSON is identical to what the
/// variant itself would produce. Decoding goes through
/// [`CredentialCodec::decode_any`](crate::CredentialCodec::decode_any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TalentCredential {
    Academic(AcademicCredential),
    Professional(ProfessionalCredential),
}

impl TalentCredential {
    pub fn as_academic(&self) -> Option<&AcademicCredential> {
        match self {
            Self::Academic(c) => Some(c),
            Self::Professional(_) => None,
        }
    }

    pub fn as_professional(&self) -> Option<&ProfessionalCredential> {
        match self {
            Self::Professional(c) => Some(c),
            Self::Academic(_) => None,
        }
    }
}

impl Credential for TalentCredential {
    fn base(&self) -> &BaseCredential {
        match self {
            Self::Academic(c) => &c.base,
            Self::Professional(c) => &c.base,
        }
    }

    fn base_mut(&mut self) -> &mut BaseCredential {
        match self {
            Self::Academic(c) => &mut c.base,
            Self::Professional(c) => &mut c.base,
        }
    }

    fn variant_type(&self) -> CredentialType {
        match self {
            Self::Academic(_) => CredentialType::Academic,
            Self::Professional(_) => CredentialType::Professional,
        }
    }
}

impl From<AcademicCredential> for TalentCredential {
    fn from(c: AcademicCredential) -> Self {
        Self::Academic(c)
    }
}

impl From<ProfessionalCredential> for TalentCredential {
    fn from(c: ProfessionalCredential) -> Self {
        Self::Professional(c)
    }
}

/// One entry of a full-ledger listing.
///
/// Records whose discriminator is not recognized are listed with their
/// shared fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CredentialListing {
    Academic(AcademicCredential),
    Professional(ProfessionalCredential),
    BaseOnly(BaseCredential),
}

impl CredentialListing {
    pub fn base(&self) -> &BaseCredential {
        match self {
            Self::Academic(c) => &c.base,
            Self::Professional(c) => &c.base,
            Self::BaseOnly(b) => b,
        }
    }

    pub fn is_base_only(&self) -> bool {
        matches!(self, Self::BaseOnly(_))
    }
}

impl From<TalentCredential> for CredentialListing {
    fn from(c: TalentCredential) -> Self {
        match c {
            TalentCredential::Academic(a) => Self::Academic(a),
            TalentCredential::Professional(p) => Self::Professional(p),
        }
    }
}
