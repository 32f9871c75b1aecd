//! Service traits at the HTTP seam.
//!
//! Controllers depend on these instead of the concrete client so tests
//! can script server behavior without a network.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::error::Result;
use crate::api::types::{
    AnalyticsInsights, AttendanceStatus, AttendanceUpdate, CalendarDay, ClassInstance,
    CreatedClassInstance, DocumentDownload, GenerationRequest, GenerationTask, NewClassInstance,
    NewSubject, QuizResult, QuizSessionData, QuizSettings, QuizSource, QuizSubmission,
    QuizSummary, Subject,
};
use crate::jobs::JobSnapshot;

#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn subjects(&self) -> Result<Vec<Subject>>;

    async fn create_subject(&self, subject: &NewSubject) -> Result<Subject>;

    async fn class_instances(&self, date: NaiveDate) -> Result<Vec<ClassInstance>>;

    async fn create_class_instance(
        &self,
        instance: &NewClassInstance,
    ) -> Result<CreatedClassInstance>;

    async fn mark_attendance(
        &self,
        instance_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceUpdate>;

    async fn calendar_view(&self, month: u32, year: i32) -> Result<Vec<CalendarDay>>;

    async fn analytics_insights(&self) -> Result<AnalyticsInsights>;

    /// Status of a statistics job, already adapted into the unified
    /// snapshot form.
    async fn attendance_job_status(&self, job_id: &str) -> Result<JobSnapshot>;
}

#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn generate_document(&self, request: &GenerationRequest) -> Result<GenerationTask>;

    async fn generation_status(&self, task_id: &str) -> Result<GenerationTask>;

    async fn download_document(&self, task_id: &str) -> Result<DocumentDownload>;
}

#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn generate_quiz(
        &self,
        settings: &QuizSettings,
        source: &QuizSource,
    ) -> Result<QuizSessionData>;

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<QuizResult>;

    async fn quiz_history(&self) -> Result<Vec<QuizSummary>>;

    async fn quiz_session(&self, session_id: i64) -> Result<QuizSessionData>;
}
