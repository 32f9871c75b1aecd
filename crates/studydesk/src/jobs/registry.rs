//! Registry of in-flight mutations.
//!
//! A key present here means the corresponding control must be shown as
//! busy. Keys are added when a mutating action starts and removed
//! exactly once on every exit path. Removal is tied to an RAII guard so
//! request failures, terminal job statuses and aborted polling tasks
//! all release the key the same way. Entries are reference counted: two
//! mutations sharing a key stay pending until both guards are gone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;

#[derive(Default)]
pub struct PendingRegistry {
    counts: Mutex<HashMap<String, usize>>,
}

impl PendingRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Marks `key` as pending and returns the guard that will release
    /// it on drop.
    pub fn begin(self: &Arc<Self>, key: impl Into<String>) -> PendingGuard {
        let key = key.into();
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry(key.clone()).or_insert(0) += 1;
        }
        PendingGuard {
            registry: Arc::clone(self),
            key,
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.counts
            .lock()
            .map(|counts| counts.contains_key(key))
            .unwrap_or(false)
    }

    /// Number of distinct pending keys.
    pub fn len(&self) -> usize {
        self.counts.lock().map(|counts| counts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: &str) {
        if let Ok(mut counts) = self.counts.lock() {
            if let Some(count) = counts.get_mut(key) {
                *count -= 1;
                if *count == 0 {
                    counts.remove(key);
                    debug!("Released pending key '{}'", key);
                }
            }
        }
    }
}

/// Removes its key from the registry when dropped.
pub struct PendingGuard {
    registry: Arc<PendingRegistry>,
    key: String,
}

impl PendingGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
