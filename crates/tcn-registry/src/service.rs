//! # Credential service
//!
//! The registry's transactional operations. Each call performs at most one
//! read and one write against the ledger and holds no locks of its own.
//!
//! ## Operations
//!
//! | Operation | Failure modes |
//! |---|---|
//! | `create_academic` / `create_professional` | `AlreadyExists` |
//! | `get_base` | `NotFound` |
//! | `get_academic` / `get_professional` | `NotFound`, `TypeMismatch` |
//! | `get_any` | `NotFound`, `UnknownVariant` |
//! | `update_verification_status` | `Unauthorized`, `NotFound`, `UnknownVariant` |
//! | `update_skills` / `update_name` | `NotFound`, `UnknownVariant` |
//! | `delete` | `NotFound` |
//! | `list_all` / `list_by_talent` | `Deserialization` (aborts the listing) |
//!
//! Every operation can also fail with `InvalidArgument` (argument
//! validation, checked before the ledger is touched) and `Substrate`.

use std::sync::Arc;

use tcn_core::{CredentialId, TalentId, VerificationStatus};
use tcn_ledger::{CredentialStore, LedgerStub};
use tcn_vc::{
    AcademicCredential, BaseCredential, Credential, CredentialCodec, CredentialListing,
    CredentialVariant, ProfessionalCredential, TalentCredential,
};

use crate::error::CredentialError;
use crate::policy::AccessPolicy;
use crate::seed::sample_credentials;

/// How `list_all` treats records whose discriminator it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// List them with their shared fields only.
    #[default]
    Lenient,
    /// Abort the listing with `UnknownVariant`.
    Strict,
}

/// Credential registry operations over a ledger. Cheap to clone and safe to
/// share across threads.
#[derive(Clone)]
pub struct CredentialService {
    store: CredentialStore,
    policy: Arc<dyn AccessPolicy>,
    listing: ListingMode,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("store", &self.store)
            .field("listing", &self.listing)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    pub fn new(store: CredentialStore, policy: Arc<dyn AccessPolicy>) -> Self {
        Self {
            store,
            policy,
            listing: ListingMode::default(),
        }
    }

    /// Convenience constructor straight from a ledger.
    pub fn on_ledger(ledger: Arc<dyn LedgerStub>, policy: Arc<dyn AccessPolicy>) -> Self {
        Self::new(CredentialStore::new(ledger), policy)
    }

    pub fn with_listing_mode(mut self, listing: ListingMode) -> Self {
        self.listing = listing;
        self
    }

    pub fn listing_mode(&self) -> ListingMode {
        self.listing
    }

    /// Caller identity as attested by the ledger.
    pub fn caller_identity(&self) -> Result<String, CredentialError> {
        Ok(self.store.caller_identity()?)
    }

    // ─── Creation ────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn create_academic(
        &self,
        id: &str,
        talent_id: &str,
        first_name: &str,
        last_name: &str,
        skills: &str,
        education: &str,
        institution: &str,
    ) -> Result<AcademicCredential, CredentialError> {
        let id = CredentialId::for_issuance(id)?;
        let talent_id = TalentId::new(talent_id)?;
        let credential = AcademicCredential::new(
            id,
            talent_id,
            first_name,
            last_name,
            skills,
            education,
            institution,
        );
        self.insert_new(&credential)?;
        Ok(credential)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_professional(
        &self,
        id: &str,
        talent_id: &str,
        first_name: &str,
        last_name: &str,
        skills: &str,
        work_experience: &str,
        company: &str,
    ) -> Result<ProfessionalCredential, CredentialError> {
        let id = CredentialId::for_issuance(id)?;
        let talent_id = TalentId::new(talent_id)?;
        let credential = ProfessionalCredential::new(
            id,
            talent_id,
            first_name,
            last_name,
            skills,
            work_experience,
            company,
        );
        self.insert_new(&credential)?;
        Ok(credential)
    }

    fn insert_new<C: CredentialVariant>(&self, credential: &C) -> Result<(), CredentialError> {
        let id = credential.credential_id();
        if self.store.exists(id)? {
            return Err(CredentialError::AlreadyExists(id.to_string()));
        }
        let bytes = CredentialCodec::encode(credential)?;
        self.store.put(id, bytes)?;
        tracing::info!(credential_id = %id, credential_type = %C::kind(), "credential created");
        Ok(())
    }

    // ─── Reads ───────────────────────────────────────────────────────

    pub fn credential_exists(&self, id: &str) -> Result<bool, CredentialError> {
        let id = CredentialId::new(id)?;
        Ok(self.store.exists(&id)?)
    }

    pub fn get_base(&self, id: &str) -> Result<BaseCredential, CredentialError> {
        let (_, bytes) = self.read(id)?;
        Ok(CredentialCodec::decode_base(&bytes)?)
    }

    pub fn get_academic(&self, id: &str) -> Result<AcademicCredential, CredentialError> {
        let (_, bytes) = self.read(id)?;
        Ok(CredentialCodec::decode_academic(&bytes)?)
    }

    pub fn get_professional(&self, id: &str) -> Result<ProfessionalCredential, CredentialError> {
        let (_, bytes) = self.read(id)?;
        Ok(CredentialCodec::decode_professional(&bytes)?)
    }

    pub fn get_any(&self, id: &str) -> Result<TalentCredential, CredentialError> {
        let (_, bytes) = self.read(id)?;
        Ok(CredentialCodec::decode_any(&bytes)?)
    }

    fn read(&self, id: &str) -> Result<(CredentialId, Vec<u8>), CredentialError> {
        let id = CredentialId::new(id)?;
        match self.store.get(&id)? {
            Some(bytes) => Ok((id, bytes)),
            None => Err(CredentialError::NotFound(id.to_string())),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────

    /// Set status and verifier. The caller must be an authorized verifier;
    /// that is checked before anything else, including argument parsing.
    pub fn update_verification_status(
        &self,
        id: &str,
        status: &str,
        verified_by: &str,
        caller_identity: &str,
    ) -> Result<TalentCredential, CredentialError> {
        if !self.policy.is_authorized_verifier(caller_identity) {
            tracing::warn!(
                credential_id = %id,
                caller = %caller_identity,
                "verification status change denied"
            );
            return Err(CredentialError::Unauthorized {
                caller: caller_identity.to_string(),
            });
        }
        let status: VerificationStatus = status.parse()?;
        let updated = self.mutate(id, |c| c.set_verification(status, verified_by))?;
        tracing::info!(
            credential_id = %id,
            status = %status,
            verified_by = %verified_by,
            "verification status updated"
        );
        Ok(updated)
    }

    pub fn update_skills(
        &self,
        id: &str,
        new_skills: &str,
    ) -> Result<TalentCredential, CredentialError> {
        let updated = self.mutate(id, |c| c.set_skills(new_skills))?;
        tracing::info!(credential_id = %id, "skills updated");
        Ok(updated)
    }

    pub fn update_name(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<TalentCredential, CredentialError> {
        let updated = self.mutate(id, |c| c.set_names(first_name, last_name))?;
        tracing::info!(credential_id = %id, "name updated");
        Ok(updated)
    }

    /// Read, decode as the stored variant, apply `f`, encode, write.
    fn mutate(
        &self,
        id: &str,
        f: impl FnOnce(&mut TalentCredential),
    ) -> Result<TalentCredential, CredentialError> {
        let (id, bytes) = self.read(id)?;
        let mut credential = CredentialCodec::decode_any(&bytes)?;
        f(&mut credential);
        let bytes = CredentialCodec::encode(&credential)?;
        self.store.put(&id, bytes)?;
        Ok(credential)
    }

    /// Permanently remove a credential. The record is not decoded, so a
    /// corrupt record can still be deleted.
    pub fn delete(&self, id: &str) -> Result<(), CredentialError> {
        let id = CredentialId::new(id)?;
        if !self.store.exists(&id)? {
            return Err(CredentialError::NotFound(id.to_string()));
        }
        self.store.delete(&id)?;
        tracing::info!(credential_id = %id, "credential deleted");
        Ok(())
    }

    /// Write the sample credentials, overwriting any records with the same
    /// IDs.
    pub fn init_ledger(&self) -> Result<Vec<TalentCredential>, CredentialError> {
        let samples = sample_credentials()?;
        for credential in &samples {
            let bytes = CredentialCodec::encode(credential)?;
            self.store.put(credential.credential_id(), bytes)?;
        }
        tracing::info!(count = samples.len(), "ledger initialized with sample credentials");
        Ok(samples)
    }

    // ─── Listing ─────────────────────────────────────────────────────

    /// Every credential on the ledger in key order, each in its actual
    /// variant. The first undecodable record aborts the listing.
    pub fn list_all(&self) -> Result<Vec<CredentialListing>, CredentialError> {
        self.list_where(|_| true)
    }

    /// `list_all` restricted to one subject.
    pub fn list_by_talent(&self, talent_id: &str) -> Result<Vec<CredentialListing>, CredentialError> {
        let talent_id = TalentId::new(talent_id)?;
        self.list_where(|base| base.talent_id == talent_id)
    }

    fn list_where(
        &self,
        keep: impl Fn(&BaseCredential) -> bool,
    ) -> Result<Vec<CredentialListing>, CredentialError> {
        let mut out = Vec::new();
        let scan = self.store.scan_all()?;
        for entry in scan {
            let entry = entry?;
            let base = CredentialCodec::decode_base(&entry.value)?;
            if !keep(&base) {
                continue;
            }
            if base.credential_type.is_recognized() {
                let credential = CredentialCodec::decode_variant(&entry.value, &base.credential_type)?;
                out.push(CredentialListing::from(credential));
            } else if self.listing == ListingMode::Strict {
                return Err(CredentialError::UnknownVariant(
                    base.credential_type.to_string(),
                ));
            } else {
                tracing::debug!(
                    key = %entry.key,
                    credential_type = %base.credential_type,
                    "listing unrecognized credential by shared fields only"
                );
                out.push(CredentialListing::BaseOnly(base));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SingleVerifierPolicy;
    use tcn_core::CredentialType;
    use tcn_ledger::MemoryLedger;

    fn service() -> (MemoryLedger, CredentialService) {
        let ledger = MemoryLedger::new("Org1MSP");
        let svc = CredentialService::on_ledger(
            Arc::new(ledger.clone()),
            Arc::new(SingleVerifierPolicy::default()),
        );
        (ledger, svc)
    }

    fn create_c1(svc: &CredentialService) {
        svc.create_academic("c1", "t1", "Ann", "Lee", "Go", "BSc CS", "X Univ")
            .unwrap();
    }

    #[test]
    fn create_rejects_invalid_ids_before_touching_ledger() {
        let (ledger, svc) = service();
        let err = svc
            .create_academic("  ", "t1", "Ann", "Lee", "Go", "BSc", "X")
            .unwrap_err();
        assert!(matches!(err, CredentialError::InvalidArgument(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn padded_ids_are_rejected_not_rewritten() {
        let (ledger, svc) = service();
        assert!(matches!(
            svc.create_academic(" c1 ", "t1", "Ann", "Lee", "Go", "BSc", "X"),
            Err(CredentialError::InvalidArgument(_))
        ));
        assert!(matches!(
            svc.create_professional("c1", "t1\n", "Ann", "Lee", "Go", "2y", "Acme"),
            Err(CredentialError::InvalidArgument(_))
        ));
        assert!(ledger.is_empty());

        create_c1(&svc);
        assert!(matches!(
            svc.get_base(" c1"),
            Err(CredentialError::InvalidArgument(_))
        ));
    }

    #[test]
    fn route_names_cannot_be_issued_as_ids() {
        let (ledger, svc) = service();
        for id in tcn_core::RESERVED_CREDENTIAL_IDS {
            assert!(matches!(
                svc.create_academic(id, "t1", "Ann", "Lee", "Go", "BSc", "X"),
                Err(CredentialError::InvalidArgument(_))
            ));
            assert!(matches!(
                svc.create_professional(id, "t1", "Ann", "Lee", "Go", "2y", "Acme"),
                Err(CredentialError::InvalidArgument(_))
            ));
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn create_is_unique_across_variants() {
        let (_, svc) = service();
        create_c1(&svc);
        let err = svc
            .create_professional("c1", "t1", "Ann", "Lee", "Go", "2y", "Acme")
            .unwrap_err();
        assert_eq!(err.to_string(), "the credential c1 already exists");
    }

    #[test]
    fn unauthorized_check_precedes_argument_parsing() {
        let (_, svc) = service();
        let err = svc
            .update_verification_status("", "not-a-status", "x", "Org2MSP")
            .unwrap_err();
        assert!(matches!(err, CredentialError::Unauthorized { caller } if caller == "Org2MSP"));
    }

    #[test]
    fn authorized_caller_with_bad_status_is_invalid_argument() {
        let (_, svc) = service();
        create_c1(&svc);
        let err = svc
            .update_verification_status("c1", "approved", "X Univ", "Org1MSP")
            .unwrap_err();
        assert!(matches!(err, CredentialError::InvalidArgument(_)));
    }

    #[test]
    fn mutation_of_missing_record_is_not_found() {
        let (_, svc) = service();
        assert!(matches!(
            svc.update_skills("nope", "Rust"),
            Err(CredentialError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_name("nope", "A", "B"),
            Err(CredentialError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_verification_status("nope", "Verified", "X", "Org1MSP"),
            Err(CredentialError::NotFound(_))
        ));
    }

    #[test]
    fn mutations_preserve_variant_fields() {
        let (_, svc) = service();
        svc.create_professional("p1", "t2", "Bob", "Johnson", "Lead", "5y PM", "Acme")
            .unwrap();
        svc.update_skills("p1", "Lead, Scrum").unwrap();
        svc.update_name("p1", "Robert", "Johnson").unwrap();
        let p = svc.get_professional("p1").unwrap();
        assert_eq!(p.base.skills, "Lead, Scrum");
        assert_eq!(p.base.first_name, "Robert");
        assert_eq!(p.company, "Acme");
        assert_eq!(p.work_experience, "5y PM");
        assert_eq!(p.base.verification_status, VerificationStatus::Pending);
    }

    #[test]
    fn get_base_works_for_unknown_variants_but_get_any_does_not() {
        let (ledger, svc) = service();
        ledger
            .put_state(
                "odd",
                br#"{"CredentialID":"odd","CredentialType":"badge","TalentID":"t","FirstName":"","LastName":"","Skills":"","VerificationStatus":"Pending","VerifiedBy":""}"#.to_vec(),
            )
            .unwrap();
        let base = svc.get_base("odd").unwrap();
        assert_eq!(base.credential_type, CredentialType::Unrecognized("badge".into()));
        assert!(matches!(
            svc.get_any("odd"),
            Err(CredentialError::UnknownVariant(t)) if t == "badge"
        ));
        assert!(matches!(
            svc.update_skills("odd", "x"),
            Err(CredentialError::UnknownVariant(_))
        ));
    }

    #[test]
    fn delete_does_not_decode() {
        let (ledger, svc) = service();
        ledger.put_state("junk", b"not json".to_vec()).unwrap();
        assert!(matches!(
            svc.get_base("junk"),
            Err(CredentialError::Deserialization(_))
        ));
        svc.delete("junk").unwrap();
        assert!(!svc.credential_exists("junk").unwrap());
    }

    #[test]
    fn init_ledger_overwrites_sample_ids() {
        let (_, svc) = service();
        svc.create_academic("credential1", "someone", "X", "Y", "", "", "")
            .unwrap();
        let written = svc.init_ledger().unwrap();
        assert_eq!(written.len(), 4);
        let c1 = svc.get_academic("credential1").unwrap();
        assert_eq!(c1.base.talent_id.as_str(), "alicesmith01");
        assert_eq!(c1.base.verification_status, VerificationStatus::Verified);
        assert_eq!(svc.list_all().unwrap().len(), 4);
    }

    #[test]
    fn list_by_talent_filters_subject() {
        let (_, svc) = service();
        svc.init_ledger().unwrap();
        let charlie = svc.list_by_talent("charliebrown02").unwrap();
        let ids: Vec<&str> = charlie
            .iter()
            .map(|c| c.base().credential_id.as_str())
            .collect();
        assert_eq!(ids, vec!["credential3", "credential4"]);
        assert!(svc.list_by_talent("nobody").unwrap().is_empty());
    }

    #[test]
    fn substrate_failure_surfaces_as_substrate_error() {
        let (ledger, svc) = service();
        ledger.set_unavailable(true);
        assert!(matches!(
            svc.get_any("c1"),
            Err(CredentialError::Substrate(_))
        ));
        assert!(matches!(svc.list_all(), Err(CredentialError::Substrate(_))));
    }

    #[test]
    fn caller_identity_comes_from_ledger() {
        let (ledger, svc) = service();
        assert_eq!(svc.caller_identity().unwrap(), "Org1MSP");
        ledger.set_caller_identity("Org2MSP");
        assert_eq!(svc.caller_identity().unwrap(), "Org2MSP");
    }
}
