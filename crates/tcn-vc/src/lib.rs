//! # tcn-vc — Talent Credential Records
//!
//! The credential record model and the codec that moves it to and from
//! ledger bytes.
//!
//! - **Record model** ([`credential`]): [`BaseCredential`] holds the fields
//!   shared by every credential; [`AcademicCredential`] and
//!   [`ProfessionalCredential`] flatten it and add their own fields.
//!   [`TalentCredential`] is the closed union of the two.
//! - **Codec** ([`codec`]): [`CredentialCodec`] encodes any variant into
//!   canonical JSON and recovers the right variant from untyped bytes by
//!   reading the `CredentialType` discriminator first.
//!
//! ## Security Invariants
//!
//! - Every encoded record goes through
//!   [`CanonicalBytes`](tcn_core::CanonicalBytes), never raw
//!   `serde_json::to_vec()`.
//! - A record is never decoded as a variant other than the one its
//!   discriminator names. A mismatch is reported, not papered over.

pub mod codec;
pub mod credential;

pub use codec::{CodecError, CredentialCodec};
pub use credential::{
    AcademicCredential, BaseCredential, Credential, CredentialListing, CredentialVariant,
    ProfessionalCredential, TalentCredential,
};
