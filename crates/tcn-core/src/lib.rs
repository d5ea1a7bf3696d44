//! # tcn-core — Foundational Types for the Talent Credentials Network
//!
//! Leaf crate of the workspace. Every other `tcn-*` crate depends on it; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `CredentialId` and `TalentId`
//!    have validated constructors. The credential ID doubles as the ledger
//!    key, so an empty or oversized ID never reaches the store.
//!
//! 2. **Closed enums for the discriminator and the status.** `CredentialType`
//!    and `VerificationStatus` carry the exact wire strings persisted on the
//!    ledger (`"academic"`, `"Pending"`, ...). A discriminator that is not
//!    recognized is still representable on the base view so readers can
//!    report what they found.
//!
//! 3. **`CanonicalBytes` newtype.** Every record written to the ledger flows
//!    through `CanonicalBytes::new()`, which yields RFC 8785 canonical JSON.
//!    Two encodings of the same record are byte-identical.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tcn-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod domain;
pub mod error;
pub mod identity;

pub use canonical::CanonicalBytes;
pub use domain::{CredentialType, VerificationStatus};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::{CredentialId, TalentId, MAX_IDENTIFIER_LEN, RESERVED_CREDENTIAL_IDS};
