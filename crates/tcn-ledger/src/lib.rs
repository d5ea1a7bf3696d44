//! # tcn-ledger — Ledger Substrate and Credential Store
//!
//! The credential registry runs on top of a shared, ordered key-value
//! ledger it does not own. This crate pins down what it needs from that
//! ledger and wraps it for credential use.
//!
//! - **Substrate contract** ([`stub`]): [`LedgerStub`] (point reads,
//!   writes, deletes, range scans, caller identity) and [`StateIterator`]
//!   (a lazy, ordered cursor that must be closed explicitly).
//! - **Reference ledger** ([`memory`]): [`MemoryLedger`], a thread-safe
//!   in-memory implementation with optional JSON snapshot persistence. Used
//!   by tests, the CLI and the gateway in development mode.
//! - **Credential store** ([`store`]): [`CredentialStore`], a bytes-in
//!   bytes-out accessor keyed by [`CredentialId`](tcn_core::CredentialId).
//!   Full scans hand back a [`ScanGuard`] that closes its cursor on every
//!   exit path.
//!
//! ## Crate Policy
//!
//! - No decoding here. Records are opaque bytes at this layer.
//! - Substrate failures are surfaced as [`LedgerError`] and never retried.

pub mod error;
pub mod memory;
pub mod store;
pub mod stub;

pub use error::LedgerError;
pub use memory::MemoryLedger;
pub use store::{CredentialStore, ScanGuard};
pub use stub::{KeyValue, LedgerStub, StateIterator};
