//! # tcn-registry — Talent Credential Registry
//!
//! The transactional operations over talent credentials. A
//! [`CredentialService`] composes the byte-level
//! [`CredentialStore`](tcn_ledger::CredentialStore), the
//! [`CredentialCodec`](tcn_vc::CredentialCodec) and an [`AccessPolicy`],
//! and enforces the registry invariants before anything is committed:
//!
//! - one record per credential ID across both variants;
//! - a record is only ever read back as the variant it was created as;
//! - verification status changes only through an authorized verifier.
//!
//! Every mutation is a full read-decode-mutate-encode-write cycle against a
//! single key. Write atomicity and conflict detection belong to the ledger.
//!
//! ## Crate Policy
//!
//! - Operations take primitive strings and validate them here.
//! - Failures are typed ([`CredentialError`]); nothing is silently
//!   defaulted and no operation commits a partial mutation.

pub mod error;
pub mod policy;
pub mod seed;
pub mod service;

pub use error::CredentialError;
pub use policy::{AccessPolicy, SingleVerifierPolicy, DEFAULT_VERIFIER_MSPID};
pub use seed::sample_credentials;
pub use service::{CredentialService, ListingMode};
