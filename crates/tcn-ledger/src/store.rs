//! # Credential store
//!
//! Thin accessor over a [`LedgerStub`]: existence check, point read, point
//! write, point delete and a full-range scan. Bytes in, bytes out.

use std::sync::Arc;

use tcn_core::CredentialId;

use crate::error::LedgerError;
use crate::stub::{KeyValue, LedgerStub, StateIterator};

/// Bytes-level credential accessor. Cheap to clone.
#[derive(Clone)]
pub struct CredentialStore {
    ledger: Arc<dyn LedgerStub>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(ledger: Arc<dyn LedgerStub>) -> Self {
        Self { ledger }
    }

    pub fn exists(&self, id: &CredentialId) -> Result<bool, LedgerError> {
        tracing::debug!(key = %id, "ledger exists");
        self.ledger.state_exists(id.as_str())
    }

    pub fn get(&self, id: &CredentialId) -> Result<Option<Vec<u8>>, LedgerError> {
        tracing::debug!(key = %id, "ledger get");
        self.ledger.get_state(id.as_str())
    }

    pub fn put(&self, id: &CredentialId, bytes: Vec<u8>) -> Result<(), LedgerError> {
        tracing::debug!(key = %id, len = bytes.len(), "ledger put");
        self.ledger.put_state(id.as_str(), bytes)
    }

    pub fn delete(&self, id: &CredentialId) -> Result<(), LedgerError> {
        tracing::debug!(key = %id, "ledger delete");
        self.ledger.del_state(id.as_str())
    }

    /// Scan every key in order. Each call opens a fresh cursor.
    pub fn scan_all(&self) -> Result<ScanGuard, LedgerError> {
        tracing::debug!("ledger scan (open range)");
        let cursor = self.ledger.get_state_by_range("", "")?;
        Ok(ScanGuard::new(cursor))
    }

    pub fn caller_identity(&self) -> Result<String, LedgerError> {
        self.ledger.caller_identity()
    }
}

/// Owns an open range cursor and closes it exactly once.
///
/// Closing happens in `Drop` unless [`ScanGuard::close`] was called first,
/// so the cursor is released on exhaustion, on an early `?` return and on
/// unwinding alike.
pub struct ScanGuard {
    cursor: Option<Box<dyn StateIterator>>,
}

impl ScanGuard {
    fn new(cursor: Box<dyn StateIterator>) -> Self {
        Self {
            cursor: Some(cursor),
        }
    }

    /// Close now and report any close failure.
    pub fn close(mut self) -> Result<(), LedgerError> {
        match self.cursor.take() {
            Some(mut cursor) => cursor.close(),
            None => Ok(()),
        }
    }
}

impl Iterator for ScanGuard {
    type Item = Result<KeyValue, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.as_mut().and_then(|c| c.next_entry())
    }
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            if let Err(e) = cursor.close() {
                tracing::warn!(error = %e, "failed to close ledger cursor");
            }
        }
    }
}
