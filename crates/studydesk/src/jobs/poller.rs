//! Polling engine for server-side jobs.
//!
//! Each polled job gets its own tokio task that issues one status
//! request per tick. Ticks for a job are strictly sequential; there is
//! never more than one in-flight status request per job. A transport
//! error while polling is treated as a terminal failure rather than
//! retried, so a job can never poll forever against a dead server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use log::{debug, info};
use tokio::task::JoinHandle;

use crate::alert::ErrorChannel;
use crate::api::ApiError;
use crate::jobs::registry::PendingGuard;
use crate::jobs::state::{JobSnapshot, JobState};

/// Completion callback, invoked at most once after the job reached a
/// terminal state.
pub type JobCallback = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Where a poller fetches job status from. Implemented by the API
/// client adapters and by scripted fakes in tests.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, job_id: &str) -> Result<JobSnapshot, ApiError>;
}

/// Receives every observed snapshot, terminal or not. Lets a state
/// machine mirror raw server statuses without owning the poll loop.
pub trait StatusObserver: Send + Sync {
    fn on_status(&self, snapshot: &JobSnapshot);
}

/// Observer for call sites that only care about the terminal callback.
pub struct NoopObserver;

impl StatusObserver for NoopObserver {
    fn on_status(&self, _snapshot: &JobSnapshot) {}
}

struct PollerInner<S> {
    source: Arc<S>,
    errors: ErrorChannel,
    interval: Duration,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

pub struct JobPoller<S: JobStatusSource + 'static> {
    inner: Arc<PollerInner<S>>,
}

impl<S: JobStatusSource + 'static> JobPoller<S> {
    pub fn new(source: Arc<S>, errors: ErrorChannel, interval: Duration) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                source,
                errors,
                interval,
                tasks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Begins polling `job_id`. Returns false without side effects when
    /// the job is already being polled; a duplicate task would double
    /// the status traffic and fire the callback twice.
    ///
    /// The pending guard travels into the polling task and is released
    /// when the task ends, whichever way it ends.
    pub fn start(
        &self,
        job_id: &str,
        guard: PendingGuard,
        observer: Arc<dyn StatusObserver>,
        on_success: JobCallback,
        on_failure: Option<JobCallback>,
    ) -> bool {
        let mut tasks = match self.inner.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        if tasks.contains_key(job_id) {
            debug!("Already polling job {}, ignoring duplicate start", job_id);
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let id = job_id.to_string();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let mut on_success = Some(on_success);
            let mut on_failure = on_failure;

            loop {
                tokio::time::sleep(inner.interval).await;

                match inner.source.job_status(&id).await {
                    Ok(snapshot) => {
                        observer.on_status(&snapshot);
                        match snapshot.state {
                            JobState::Succeeded => {
                                info!("Job {} succeeded", id);
                                if let Some(callback) = on_success.take() {
                                    callback().await;
                                }
                                break;
                            }
                            JobState::Failed { message } => {
                                let message = message
                                    .unwrap_or_else(|| format!("Job {} failed on the server", id));
                                inner.errors.raise(message);
                                if let Some(callback) = on_failure.take() {
                                    callback().await;
                                }
                                break;
                            }
                            JobState::Queued | JobState::Processing => {}
                        }
                    }
                    Err(e) => {
                        inner
                            .errors
                            .raise(format!("Lost track of job {}: {}", id, e.user_message()));
                        if let Some(callback) = on_failure.take() {
                            callback().await;
                        }
                        break;
                    }
                }
            }

            if let Ok(mut tasks) = inner.tasks.lock() {
                tasks.remove(&id);
            }
        });

        tasks.insert(job_id.to_string(), handle);
        true
    }

    /// Cancels polling for one job. The aborted task drops its pending
    /// guard; no callback fires.
    pub fn stop(&self, job_id: &str) {
        let handle = self
            .inner
            .tasks
            .lock()
            .ok()
            .and_then(|mut tasks| tasks.remove(job_id));
        if let Some(handle) = handle {
            debug!("Stopping poll task for job {}", job_id);
            handle.abort();
        }
    }

    /// Cancels every active poll task.
    pub fn stop_all(&self) {
        let drained: Vec<(String, JoinHandle<()>)> = self
            .inner
            .tasks
            .lock()
            .map(|mut tasks| tasks.drain().collect())
            .unwrap_or_default();
        for (job_id, handle) in drained {
            debug!("Stopping poll task for job {}", job_id);
            handle.abort();
        }
    }

    pub fn is_polling(&self, job_id: &str) -> bool {
        self.inner
            .tasks
            .lock()
            .map(|tasks| tasks.contains_key(job_id))
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.inner.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }
}

impl<S: JobStatusSource + 'static> Drop for JobPoller<S> {
    fn drop(&mut self) {
        self.stop_all();
    }
}
