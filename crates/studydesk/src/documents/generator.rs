//! Document generation state machine.
//!
//! Lifecycle: `STARTING` is set locally when the request goes out, then
//! the server's reported status is mirrored verbatim on every poll
//! tick (`QUEUED`, `PROCESSING`, then `COMPLETED` or `FAILED`). The
//! client never corrects or reorders what the server reports; a status
//! that moves backwards is rendered as-is. `COMPLETED` is the only
//! state that permits download, `FAILED` surfaces the server's error.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::alert::ErrorChannel;
use crate::api::error::Result as ApiResult;
use crate::api::types::{GenerationRequest, GenerationTask};
use crate::api::DocumentApi;
use crate::documents::download::{filename_from_content_disposition, DownloadedDocument};
use crate::error::Result;
use crate::jobs::{
    JobCallback, JobPoller, JobSnapshot, JobState, JobStatusSource, PendingRegistry,
    StatusObserver,
};

/// Document sections in render order.
pub const ALL_SECTIONS: &[&str] = &[
    "Name",
    "UID",
    "Class and Batch",
    "Experiment No",
    "Date",
    "Aim",
    "Objective",
    "Problem Statement",
    "Theory",
    "Pseudo-Code/Algo",
    "Analysis",
    "Program",
    "Result",
    "Conclusion",
    "References",
];

/// Sections filled in by the user rather than generated.
pub const BASIC_SECTIONS: &[&str] =
    &["Name", "UID", "Class and Batch", "Experiment No", "Date", "Aim"];

/// Sections produced by the model from the aim.
pub const AI_GENERATED_SECTIONS: &[&str] = &[
    "Objective",
    "Problem Statement",
    "Theory",
    "Pseudo-Code/Algo",
    "Analysis",
    "Program",
    "Result",
    "Conclusion",
    "References",
];

/// The one section that can never be deselected.
pub const REQUIRED_SECTION: &str = "Aim";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Required field '{0}' must not be empty")]
    MissingField(&'static str),

    #[error("Section '{0}' must be selected")]
    MissingSection(&'static str),

    #[error("A generation task is already running")]
    AlreadyRunning,

    #[error("No completed document is available to download")]
    NotReady,
}

/// What the generator page renders: the task handle, the server's
/// status wording untouched, and the error of a failed task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationView {
    pub task_id: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Adapts the task status endpoint to the polling engine.
pub struct DocumentJobSource<A> {
    api: Arc<A>,
}

#[async_trait]
impl<A: DocumentApi> JobStatusSource for DocumentJobSource<A> {
    async fn job_status(&self, task_id: &str) -> ApiResult<JobSnapshot> {
        let task = self.api.generation_status(task_id).await?;
        Ok(JobSnapshot::from_generation_task(&task))
    }
}

/// Mirrors every observed snapshot into the view, verbatim.
struct MirrorObserver {
    state: Arc<RwLock<GenerationView>>,
}

impl StatusObserver for MirrorObserver {
    fn on_status(&self, snapshot: &JobSnapshot) {
        if let Ok(mut view) = self.state.write() {
            view.status = Some(snapshot.raw_status.clone());
            if let JobState::Failed { message } = &snapshot.state {
                view.error = message.clone();
            }
        }
    }
}

pub struct DocumentGenerator<A: DocumentApi + 'static> {
    api: Arc<A>,
    state: Arc<RwLock<GenerationView>>,
    errors: ErrorChannel,
    pending: Arc<PendingRegistry>,
    poller: JobPoller<DocumentJobSource<A>>,
}

impl<A: DocumentApi + 'static> DocumentGenerator<A> {
    pub fn new(api: Arc<A>, errors: ErrorChannel, poll_interval: Duration) -> Self {
        let source = Arc::new(DocumentJobSource {
            api: Arc::clone(&api),
        });
        Self {
            api,
            state: Arc::new(RwLock::new(GenerationView::default())),
            errors: errors.clone(),
            pending: PendingRegistry::new(),
            poller: JobPoller::new(source, errors, poll_interval),
        }
    }

    pub fn view(&self) -> GenerationView {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// True from request start until a terminal status is observed.
    pub fn is_running(&self) -> bool {
        let view = self.view();
        matches!(
            view.status.as_deref(),
            Some("STARTING") | Some("QUEUED") | Some("PROCESSING")
        )
    }

    /// Validates and submits a generation request, then polls the task.
    /// Validation failure blocks the request entirely; nothing is sent
    /// and no state changes.
    pub async fn generate(&self, request: GenerationRequest) -> Result<()> {
        validate_request(&request)?;

        if self.is_running() {
            self.errors.raise("A document is already being generated");
            return Err(DocumentError::AlreadyRunning.into());
        }

        self.write_state(|view| {
            *view = GenerationView {
                task_id: None,
                status: Some("STARTING".to_string()),
                error: None,
            };
        });

        let task = match self.api.generate_document(&request).await {
            Ok(task) => task,
            Err(e) => {
                let message = e.user_message();
                self.write_state(|view| {
                    view.status = Some("FAILED".to_string());
                    view.error = Some(message.clone());
                });
                self.errors.raise(message);
                return Err(e.into());
            }
        };

        self.adopt_task(&task);
        Ok(())
    }

    /// Resumes polling a task created earlier, e.g. after the page was
    /// reopened while the server was still processing.
    pub fn resume(&self, task: &GenerationTask) {
        self.adopt_task(task);
    }

    fn adopt_task(&self, task: &GenerationTask) {
        self.write_state(|view| {
            view.task_id = Some(task.task_id.clone());
            view.status = Some(task.status.clone());
            view.error = task.error.clone();
        });

        let snapshot = JobSnapshot::from_generation_task(task);
        if snapshot.state.is_terminal() {
            if let JobState::Failed { message } = snapshot.state {
                self.errors.raise(
                    message.unwrap_or_else(|| "Document generation failed".to_string()),
                );
            }
            return;
        }

        let guard = self.pending.begin(task.task_id.clone());
        let observer = Arc::new(MirrorObserver {
            state: Arc::clone(&self.state),
        });
        let on_success: JobCallback = Box::new(|| Box::pin(async {}));
        self.poller
            .start(&task.task_id, guard, observer, on_success, None);
    }

    /// Downloads the finished document. Only valid in `COMPLETED`;
    /// repeating the download is allowed and has no further effect on
    /// the task.
    pub async fn download(&self) -> Result<DownloadedDocument> {
        let view = self.view();
        let task_id = match (view.status.as_deref(), view.task_id) {
            (Some("COMPLETED"), Some(task_id)) => task_id,
            _ => {
                self.errors.raise("No completed document to download");
                return Err(DocumentError::NotReady.into());
            }
        };

        match self.api.download_document(&task_id).await {
            Ok(download) => Ok(DownloadedDocument {
                filename: filename_from_content_disposition(
                    download.content_disposition.as_deref(),
                ),
                bytes: download.bytes,
            }),
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Abandons the current task and clears all local state. A new
    /// generation starts from scratch; the old task id is never reused.
    pub fn start_over(&self) {
        if let Some(task_id) = self.view().task_id {
            self.poller.stop(&task_id);
        }
        self.write_state(|view| *view = GenerationView::default());
        self.errors.dismiss();
    }

    fn write_state(&self, mutate: impl FnOnce(&mut GenerationView)) {
        let mut view = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        mutate(&mut view);
    }
}

fn validate_request(request: &GenerationRequest) -> std::result::Result<(), DocumentError> {
    let details = &request.basic_details;
    let fields: [(&'static str, &str); 6] = [
        ("Name", &details.name),
        ("UID", &details.uid),
        ("Class and Batch", &details.class_and_batch),
        ("Experiment No", &details.experiment_no),
        ("Date", &details.date),
        ("Aim", &details.aim),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(DocumentError::MissingField(name));
        }
    }

    if !request
        .selected_sections
        .iter()
        .any(|section| section == REQUIRED_SECTION)
    {
        return Err(DocumentError::MissingSection(REQUIRED_SECTION));
    }

    Ok(())
}
