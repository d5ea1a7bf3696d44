//! # In-memory reference ledger
//!
//! A [`LedgerStub`] backed by a `BTreeMap` behind a `parking_lot::RwLock`.
//! The lock is never held across `.await` points, so it is safe to share
//! through the async gateway. Range cursors iterate over a copy of the
//! matching entries taken when the cursor opens.
//!
//! ## Snapshots
//!
//! A ledger opened with [`MemoryLedger::open_snapshot`] loads its state from
//! a JSON file (values hex-encoded) and rewrites the file on every mutation.
//! This is what gives the CLI state across invocations.
//!
//! A mutation is written to disk before it becomes visible in memory: the
//! snapshot is rendered from a copy with the change applied, and only once
//! the file is in place is the change committed to the map. A failed write
//! leaves both the file and the in-memory state as they were. Writers are
//! serialized by a separate mutex, so readers never wait on file I/O.
//!
//! ## Test hooks
//!
//! [`MemoryLedger::open_cursors`] counts cursors opened but not yet closed,
//! and [`MemoryLedger::set_unavailable`] makes every call fail, so tests can
//! assert cursor release and substrate error propagation.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::stub::{KeyValue, LedgerStub, StateIterator};

const SNAPSHOT_VERSION: u32 = 1;

/// Thread-safe, cloneable in-memory ledger. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    /// Held across snapshot write and commit.
    writer: Mutex<()>,
    identity: RwLock<String>,
    open_cursors: Arc<AtomicUsize>,
    unavailable: AtomicBool,
    snapshot_path: Option<PathBuf>,
}

impl MemoryLedger {
    /// Empty ledger whose callers present `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self::with_state(identity.into(), BTreeMap::new(), None)
    }

    fn with_state(
        identity: String,
        state: BTreeMap<String, Vec<u8>>,
        snapshot_path: Option<PathBuf>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                writer: Mutex::new(()),
                identity: RwLock::new(identity),
                open_cursors: Arc::new(AtomicUsize::new(0)),
                unavailable: AtomicBool::new(false),
                snapshot_path,
            }),
        }
    }

    /// Ledger persisted at `path`. A missing file starts an empty ledger;
    /// the file is created on the first write.
    pub fn open_snapshot(
        identity: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            load_snapshot(&path)?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), entries = state.len(), "opened ledger snapshot");
        Ok(Self::with_state(identity.into(), state, Some(path)))
    }

    /// Write the current state to `path`.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let state = self.inner.state.read();
        write_snapshot(path.as_ref(), &state)
    }

    /// Change the identity presented by subsequent callers.
    pub fn set_caller_identity(&self, identity: impl Into<String>) {
        *self.inner.identity.write() = identity.into();
    }

    /// Make every subsequent call fail with `Unavailable` (or stop doing so).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Cursors opened and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.inner.open_cursors.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.state.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), LedgerError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("ledger marked unavailable".into()));
        }
        Ok(())
    }

    /// Apply `change` durably: snapshot first (when persisted), then memory.
    fn mutate<F>(&self, change: F) -> Result<(), LedgerError>
    where
        F: Fn(&mut BTreeMap<String, Vec<u8>>),
    {
        self.check_available()?;
        let _writer = self.inner.writer.lock();
        if let Some(path) = &self.inner.snapshot_path {
            let mut next = self.inner.state.read().clone();
            change(&mut next);
            write_snapshot(path, &next)?;
        }
        change(&mut *self.inner.state.write());
        Ok(())
    }
}

impl LedgerStub for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.check_available()?;
        Ok(self.inner.state.read().get(key).cloned())
    }

    fn state_exists(&self, key: &str) -> Result<bool, LedgerError> {
        self.check_available()?;
        Ok(self.inner.state.read().contains_key(key))
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.mutate(|state| {
            state.insert(key.to_string(), value.clone());
        })
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        self.mutate(|state| {
            state.remove(key);
        })
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateIterator>, LedgerError> {
        self.check_available()?;
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };
        // BTreeMap::range panics on inverted bounds.
        if let (Bound::Included(s), Bound::Excluded(e)) = (&lower, &upper) {
            if s > e {
                return Err(LedgerError::Unavailable(format!(
                    "invalid range: start '{s}' is after end '{e}'"
                )));
            }
        }
        let entries: Vec<KeyValue> = self
            .inner
            .state
            .read()
            .range((lower, upper))
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();
        self.inner.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            entries: entries.into_iter(),
            open_cursors: Arc::clone(&self.inner.open_cursors),
            closed: false,
        }))
    }

    fn caller_identity(&self) -> Result<String, LedgerError> {
        let identity = self.inner.identity.read().clone();
        if identity.trim().is_empty() {
            return Err(LedgerError::Identity("no MSP ID bound to caller".into()));
        }
        Ok(identity)
    }
}

struct MemoryCursor {
    entries: std::vec::IntoIter<KeyValue>,
    open_cursors: Arc<AtomicUsize>,
    closed: bool,
}

impl StateIterator for MemoryCursor {
    fn next_entry(&mut self) -> Option<Result<KeyValue, LedgerError>> {
        if self.closed {
            return Some(Err(LedgerError::CursorClosed));
        }
        self.entries.next().map(Ok)
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// -- Snapshot file -------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: Vec<SnapshotEntry>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    key: String,
    #[serde(with = "hex_bytes")]
    value: Vec<u8>,
}

fn snapshot_error(path: &Path, reason: impl std::fmt::Display) -> LedgerError {
    LedgerError::Snapshot {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn load_snapshot(path: &Path) -> Result<BTreeMap<String, Vec<u8>>, LedgerError> {
    let raw = std::fs::read(path).map_err(|e| snapshot_error(path, e))?;
    let snapshot: Snapshot = serde_json::from_slice(&raw).map_err(|e| snapshot_error(path, e))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(snapshot_error(
            path,
            format!("unsupported snapshot version {}", snapshot.version),
        ));
    }
    Ok(snapshot
        .entries
        .into_iter()
        .map(|e| (e.key, e.value))
        .collect())
}

fn write_snapshot(path: &Path, state: &BTreeMap<String, Vec<u8>>) -> Result<(), LedgerError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        entries: state
            .iter()
            .map(|(k, v)| SnapshotEntry {
                key: k.clone(),
                value: v.clone(),
            })
            .collect(),
    };
    let json = serde_json::to_vec_pretty(&snapshot).map_err(|e| snapshot_error(path, e))?;
    // Write beside the target and rename, so a crash never leaves a torn file.
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    std::fs::write(&staging, json).map_err(|e| snapshot_error(path, e))?;
    std::fs::rename(&staging, path).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        snapshot_error(path, e)
    })
}

/// Serde helper for hex-encoding `Vec<u8>` fields.
mod hex_bytes {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.len() % 2 != 0 {
            return Err(serde::de::Error::custom("odd-length hex string"));
        }
        s.as_bytes()
            .chunks(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|p| u8::from_str_radix(p, 16).ok())
                    .ok_or_else(|| serde::de::Error::custom("invalid hex digit"))
            })
            .collect()
    }
}
