//! Unified job state.
//!
//! The server speaks two status vocabularies: attendance statistics
//! jobs report `PENDING`/`SUCCESS`/`FAILURE`, document generation tasks
//! report `STARTING`/`QUEUED`/`PROCESSING`/`COMPLETED`/`FAILED`. Both
//! are translated here, at the boundary, into one tagged state. The raw
//! string is kept alongside so display layers can render exactly what
//! the server said.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::types::{GenerationTask, StatJob};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum JobState {
    Queued,
    Processing,
    Succeeded,
    Failed { message: Option<String> },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed { .. })
    }
}

/// One observed status of a polled job: the unified state plus the
/// untranslated server wording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub raw_status: String,
    pub state: JobState,
}

impl JobSnapshot {
    /// Adapts an attendance statistics job payload.
    pub fn from_stat_job(job: &StatJob) -> Self {
        let state = match job.status.as_str() {
            "PENDING" => JobState::Queued,
            "SUCCESS" => JobState::Succeeded,
            "FAILURE" => JobState::Failed {
                message: job.error_message.clone(),
            },
            other => {
                warn!("Unknown stat job status '{}', treating as in progress", other);
                JobState::Processing
            }
        };
        Self {
            job_id: job.id.to_string(),
            raw_status: job.status.clone(),
            state,
        }
    }

    /// Adapts a document generation task payload. Non-terminal statuses
    /// are passed through even when they move backwards; the server is
    /// the authority on task progress.
    pub fn from_generation_task(task: &GenerationTask) -> Self {
        let state = match task.status.as_str() {
            "STARTING" | "QUEUED" => JobState::Queued,
            "PROCESSING" => JobState::Processing,
            "COMPLETED" => JobState::Succeeded,
            "FAILED" => JobState::Failed {
                message: task.error.clone(),
            },
            other => {
                warn!(
                    "Unknown generation status '{}' for task {}, treating as in progress",
                    other, task.task_id
                );
                JobState::Processing
            }
        };
        Self {
            job_id: task.task_id.clone(),
            raw_status: task.status.clone(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat_job(status: &str, error: Option<&str>) -> StatJob {
        StatJob {
            id: 42,
            status: status.to_string(),
            error_message: error.map(String::from),
            created_at: chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_stat_job_vocabulary() {
        assert_eq!(
            JobSnapshot::from_stat_job(&stat_job("PENDING", None)).state,
            JobState::Queued
        );
        assert_eq!(
            JobSnapshot::from_stat_job(&stat_job("SUCCESS", None)).state,
            JobState::Succeeded
        );
        assert_eq!(
            JobSnapshot::from_stat_job(&stat_job("FAILURE", Some("boom"))).state,
            JobState::Failed {
                message: Some("boom".to_string())
            }
        );
    }

    #[test]
    fn test_stat_job_keeps_raw_status_and_id() {
        let snapshot = JobSnapshot::from_stat_job(&stat_job("SUCCESS", None));
        assert_eq!(snapshot.job_id, "42");
        assert_eq!(snapshot.raw_status, "SUCCESS");
    }

    #[test]
    fn test_generation_vocabulary() {
        let task = |status: &str| GenerationTask {
            task_id: "t-1".to_string(),
            status: status.to_string(),
            error: None,
        };

        assert_eq!(
            JobSnapshot::from_generation_task(&task("STARTING")).state,
            JobState::Queued
        );
        assert_eq!(
            JobSnapshot::from_generation_task(&task("QUEUED")).state,
            JobState::Queued
        );
        assert_eq!(
            JobSnapshot::from_generation_task(&task("PROCESSING")).state,
            JobState::Processing
        );
        assert_eq!(
            JobSnapshot::from_generation_task(&task("COMPLETED")).state,
            JobState::Succeeded
        );
    }

    #[test]
    fn test_generation_failure_carries_message() {
        let task = GenerationTask {
            task_id: "t-2".to_string(),
            status: "FAILED".to_string(),
            error: Some("llm timeout".to_string()),
        };
        assert_eq!(
            JobSnapshot::from_generation_task(&task).state,
            JobState::Failed {
                message: Some("llm timeout".to_string())
            }
        );
    }

    #[test]
    fn test_unknown_status_is_nonterminal() {
        let snapshot = JobSnapshot::from_stat_job(&stat_job("RETRYING", None));
        assert!(!snapshot.state.is_terminal());
        assert_eq!(snapshot.raw_status, "RETRYING");
    }

    #[test]
    fn test_terminality() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed { message: None }.is_terminal());
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Processing.is_terminal());
    }
}
