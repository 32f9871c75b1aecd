pub mod alert;
pub mod api;
pub mod attendance;
pub mod config;
pub mod documents;
pub mod error;
pub mod jobs;
pub mod optimistic;
pub mod quiz;
pub mod session;

pub use alert::ErrorChannel;
pub use api::{ApiClient, ApiError, AttendanceApi, DocumentApi, QuizApi};
pub use attendance::{AttendanceTracker, AttendanceView};
pub use config::{load_config, ClientConfig};
pub use documents::{DocumentGenerator, DownloadedDocument};
pub use error::{ConfigError, Result, SessionError, StudydeskError};
pub use jobs::{JobPoller, JobSnapshot, JobState, PendingGuard, PendingRegistry};
pub use optimistic::OptimisticLayer;
pub use quiz::QuizController;
pub use session::SessionStore;
