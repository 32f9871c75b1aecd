//! Snapshot layer for optimistic updates.
//!
//! Before a local patch is applied, the previous value of the affected
//! entity is captured here keyed by entity id. If the server later
//! rejects the mutation the snapshot is taken back and restored; if the
//! mutation is confirmed the snapshot is discarded. A second capture for
//! the same key supersedes the first, so a revert always restores the
//! state seen just before the latest mutation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

pub struct OptimisticLayer<K, T> {
    snapshots: Mutex<HashMap<K, T>>,
}

impl<K, T> OptimisticLayer<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    pub fn new() -> Self {
        Self {
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    /// Stores the pre-mutation value for `key`, replacing any snapshot a
    /// previous in-flight mutation left behind (last writer wins).
    pub fn capture(&self, key: K, value: T) {
        if let Ok(mut snapshots) = self.snapshots.lock() {
            snapshots.insert(key, value);
        }
    }

    /// Discards the snapshot after the server confirmed the mutation.
    /// Returns false when no snapshot was held for `key`.
    pub fn confirm(&self, key: &K) -> bool {
        self.snapshots
            .lock()
            .map(|mut snapshots| snapshots.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Takes the snapshot back so the caller can restore it. Returns
    /// `None` when the mutation was already confirmed or never captured.
    pub fn revert(&self, key: &K) -> Option<T> {
        self.snapshots
            .lock()
            .ok()
            .and_then(|mut snapshots| snapshots.remove(key))
    }

    pub fn has_inflight(&self, key: &K) -> bool {
        self.snapshots
            .lock()
            .map(|snapshots| snapshots.contains_key(key))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots
            .lock()
            .map(|snapshots| snapshots.is_empty())
            .unwrap_or(true)
    }
}

impl<K, T> Default for OptimisticLayer<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
