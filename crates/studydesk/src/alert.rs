//! Per-page error surface.
//!
//! Controllers report every failure here instead of swallowing it. The
//! channel holds at most one message at a time; a new failure replaces
//! the previous one, mirroring a dismissable alert banner.

use std::sync::{Arc, RwLock};

/// Clonable handle to a shared error slot.
///
/// `raise` both logs and stores the message so that nothing is lost
/// when no display layer is attached.
#[derive(Clone, Default)]
pub struct ErrorChannel {
    current: Arc<RwLock<Option<String>>>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user-visible failure message, replacing any previous one.
    pub fn raise(&self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        if let Ok(mut slot) = self.current.write() {
            *slot = Some(message);
        }
    }

    /// Clears the current message.
    pub fn dismiss(&self) {
        if let Ok(mut slot) = self.current.write() {
            *slot = None;
        }
    }

    /// Returns the currently raised message, if any.
    pub fn current(&self) -> Option<String> {
        self.current.read().ok().and_then(|slot| slot.clone())
    }
}
