pub mod poller;
pub mod registry;
pub mod state;

pub use poller::{JobCallback, JobPoller, JobStatusSource, NoopObserver, StatusObserver};
pub use registry::{PendingGuard, PendingRegistry};
pub use state::{JobSnapshot, JobState};
