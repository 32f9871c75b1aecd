use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_attendance_poll_ms() -> u64 {
    2000
}

fn default_document_poll_ms() -> u64 {
    3000
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Client-side configuration. Everything except `base_url` has a
/// sensible default so a minimal config file is just the server URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the dashboard API server.
    pub base_url: String,

    /// Poll interval for attendance recalculation jobs.
    #[serde(default = "default_attendance_poll_ms")]
    pub attendance_poll_interval_ms: u64,

    /// Poll interval for document generation tasks.
    #[serde(default = "default_document_poll_ms")]
    pub document_poll_interval_ms: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            attendance_poll_interval_ms: default_attendance_poll_ms(),
            document_poll_interval_ms: default_document_poll_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn attendance_poll_interval(&self) -> Duration {
        Duration::from_millis(self.attendance_poll_interval_ms)
    }

    pub fn document_poll_interval(&self) -> Duration {
        Duration::from_millis(self.document_poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
