//! In-memory storage of trace entries
//!
//! Entries are kept for the lifetime of the owning scope in the order their calls settled.
//! There is no size bound and no deduplication.

use super::trace_entry::TraceEntry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Type alias for callbacks fired on every stored entry
pub type TraceCallback = Arc<dyn Fn(&TraceEntry) + Send + Sync>;

/// Append-only store for captured trace entries
///
/// TraceStorage is shared between every tracer of a scope and provides:
/// - An optional callback triggered on each stored entry
/// - A full ordered view of the entries
/// - Query for the last N entries
/// - Clearing between scopes
pub struct TraceStorage {
    entries: Mutex<Vec<TraceEntry>>,
    on_add_callback: Option<TraceCallback>,
}

impl TraceStorage {
    /// Create a new trace storage
    ///
    /// # Arguments
    ///
    /// * `on_add_callback` - Optional callback function called whenever an entry is stored
    pub fn new(on_add_callback: Option<TraceCallback>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            on_add_callback,
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<TraceEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry
    pub fn add(&self, entry: TraceEntry) {
        if let Some(callback) = &self.on_add_callback {
            callback(&entry);
        }

        self.entries().push(entry);
    }

    /// All entries in the order they were added
    ///
    /// The returned vector reflects the storage at the moment of the call.
    pub fn all(&self) -> Vec<TraceEntry> {
        self.entries().clone()
    }

    /// Get the last N entries
    pub fn last_n(&self, n: usize) -> Vec<TraceEntry> {
        let entries = self.entries();
        let start_idx = entries.len().saturating_sub(n);
        entries[start_idx..].to_vec()
    }

    /// Clear all entries from the storage
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Get the total number of stored entries
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Check if the storage is empty
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for TraceStorage {
    fn default() -> Self {
        Self::new(None)
    }
}
