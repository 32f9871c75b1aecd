//! Persisted session state.
//!
//! The server issues a CSRF token at login which must be echoed back in
//! the `X-CSRF-Token` header on every request. The token is persisted as
//! a small JSON file under the user config directory so a restarted
//! client keeps its session.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

const SESSION_FILE: &str = "session.json";
const APP_DIR: &str = "studydesk";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(default)]
    csrf_token: Option<String>,
}

pub struct SessionStore {
    path: PathBuf,
    data: RwLock<SessionData>,
}

impl SessionStore {
    /// Opens the session file at the platform default location,
    /// `<config_dir>/studydesk/session.json`.
    pub fn open_default() -> Result<Self, SessionError> {
        let base = dirs::config_dir().ok_or(SessionError::NoConfigDir)?;
        Self::open(base.join(APP_DIR).join(SESSION_FILE))
    }

    /// Opens a session file at an explicit path. A missing file is an
    /// empty session, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}, starting empty", path.display());
                SessionData::default()
            }
            Err(e) => {
                return Err(SessionError::ReadFile { path, source: e });
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.data
            .read()
            .ok()
            .and_then(|data| data.csrf_token.clone())
    }

    /// Stores and persists a new CSRF token.
    pub fn set_csrf_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let data = {
            let mut guard = self
                .data
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.csrf_token = Some(token.into());
            guard.clone()
        };
        self.persist(&data)
    }

    /// Drops the token and persists the empty session.
    pub fn clear(&self) -> Result<(), SessionError> {
        let data = {
            let mut guard = self
                .data
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = SessionData::default();
            guard.clone()
        };
        self.persist(&data)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &SessionData) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::WriteFile {
                path: self.path.clone(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content).map_err(|e| SessionError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }
}
