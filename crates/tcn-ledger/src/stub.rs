//! # Substrate contract
//!
//! What the credential layer consumes from the ledger runtime. Both traits
//! are object safe so a store can hold `Arc<dyn LedgerStub>` and swap the
//! in-memory ledger for a real one without generics leaking upward.

use crate::error::LedgerError;

/// One entry yielded by a range cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Lazy, key-ordered range cursor.
///
/// The substrate holds resources for an open cursor until `close` is called.
/// Dropping a cursor without closing it leaks those resources.
pub trait StateIterator: Send {
    /// Next entry in key order, `None` when exhausted.
    fn next_entry(&mut self) -> Option<Result<KeyValue, LedgerError>>;

    /// Release the cursor. Closing twice is not an error.
    fn close(&mut self) -> Result<(), LedgerError>;
}

/// Ordered key-value ledger with caller attestation.
pub trait LedgerStub: Send + Sync {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    fn state_exists(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get_state(key)?.is_some())
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Remove a key. Removing an absent key is not an error at this level.
    fn del_state(&self, key: &str) -> Result<(), LedgerError>;

    /// Open a cursor over `[start, end)`. An empty bound is open-ended.
    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateIterator>, LedgerError>;

    /// Organizational identity (MSP ID) of the submitting client.
    fn caller_identity(&self) -> Result<String, LedgerError>;
}
