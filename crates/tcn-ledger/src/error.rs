//! Substrate error type.

use thiserror::Error;

/// Failure reported by the ledger substrate.
///
/// Opaque to the credential layer: it is wrapped and propagated, never
/// inspected for retry.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The substrate could not serve the request.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A concurrent writer touched the same key.
    #[error("write conflict on key '{key}'")]
    Conflict { key: String },

    /// Cursor used after it was closed.
    #[error("range cursor already closed")]
    CursorClosed,

    /// Caller identity could not be established.
    #[error("caller identity unavailable: {0}")]
    Identity(String),

    /// Snapshot file could not be read or written.
    #[error("ledger snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },
}
