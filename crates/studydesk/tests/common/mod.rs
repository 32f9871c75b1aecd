//! Shared fakes and builders for studydesk integration tests.
//!
//! The fakes implement the API service traits over scripted responses
//! so controller behavior can be driven tick by tick without a server.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use studydesk::api::error::{ApiError, Result};
use studydesk::api::types::{
    AnalyticsInsights, AttendanceRecord, AttendanceStatus, AttendanceUpdate, CalendarDay,
    ClassInstance, CreatedClassInstance, DocumentDownload, GenerationRequest, GenerationTask,
    NewClassInstance, NewSubject, QuizResult, QuizSessionData, QuizSettings, QuizSource,
    QuizSubmission, QuizSummary, Subject, SubjectSimple,
};
use studydesk::api::{AttendanceApi, DocumentApi, QuizApi};
use studydesk::jobs::{JobSnapshot, JobState, JobStatusSource};

// --- builders ---

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(9, 0, 0).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn subject(id: i64, name: &str, held: u32, attended: u32) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        code: None,
        color: None,
        user_id: 1,
        total_classes_held: held,
        total_classes_attended: attended,
        schedules: Vec::new(),
        created_at: datetime(2026, 1, 1),
        attendance_percentage: studydesk::attendance::percentage(held, attended),
        classes_needed_for_75: studydesk::attendance::classes_needed_for_75(held, attended),
        bunkable_classes_for_75: studydesk::attendance::bunkable_for_75(held, attended),
    }
}

pub fn instance(id: i64, on: NaiveDate, status: Option<AttendanceStatus>) -> ClassInstance {
    ClassInstance {
        id,
        date: on,
        time: time(10, 0),
        subject: SubjectSimple {
            id: 1,
            name: "Operating Systems".to_string(),
            code: None,
            color: None,
        },
        attendance_record: status.map(|status| AttendanceRecord {
            id: id * 100,
            class_instance_id: id,
            status,
            created_at: datetime(2026, 2, 1),
        }),
    }
}

pub fn record(instance_id: i64, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        id: instance_id * 100,
        class_instance_id: instance_id,
        status,
        created_at: datetime(2026, 2, 1),
    }
}

pub fn stat_job(id: i64, status: &str) -> studydesk::api::types::StatJob {
    studydesk::api::types::StatJob {
        id,
        status: status.to_string(),
        error_message: None,
        created_at: datetime(2026, 2, 1),
    }
}

pub fn snapshot(job_id: &str, raw_status: &str, state: JobState) -> JobSnapshot {
    JobSnapshot {
        job_id: job_id.to_string(),
        raw_status: raw_status.to_string(),
        state,
    }
}

pub fn pending_snapshot(job_id: &str) -> JobSnapshot {
    snapshot(job_id, "PENDING", JobState::Queued)
}

pub fn success_snapshot(job_id: &str) -> JobSnapshot {
    snapshot(job_id, "SUCCESS", JobState::Succeeded)
}

pub fn failure_snapshot(job_id: &str, message: &str) -> JobSnapshot {
    snapshot(
        job_id,
        "FAILURE",
        JobState::Failed {
            message: Some(message.to_string()),
        },
    )
}

pub fn status_error(message: &str) -> ApiError {
    ApiError::Status {
        url: "http://test.local/api".to_string(),
        status: 500,
        message: message.to_string(),
    }
}

pub fn generation_task(task_id: &str, status: &str) -> GenerationTask {
    GenerationTask {
        task_id: task_id.to_string(),
        status: status.to_string(),
        error: None,
    }
}

// --- scripted job source ---

/// Returns scripted responses in order; once the script runs out every
/// further tick reports a non-terminal status.
#[derive(Default)]
pub struct ScriptedJobSource {
    responses: Mutex<VecDeque<Result<JobSnapshot>>>,
    calls: AtomicU32,
}

impl ScriptedJobSource {
    pub fn new(responses: Vec<Result<JobSnapshot>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStatusSource for ScriptedJobSource {
    async fn job_status(&self, job_id: &str) -> Result<JobSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(pending_snapshot(job_id)))
    }
}

// --- attendance fake ---

#[derive(Default)]
pub struct FakeAttendanceApi {
    pub subjects: Mutex<Vec<Subject>>,
    pub instances: Mutex<HashMap<NaiveDate, Vec<ClassInstance>>>,
    pub calendar: Mutex<Vec<CalendarDay>>,
    pub analytics: Mutex<Option<AnalyticsInsights>>,
    pub mark_response: Mutex<Option<Result<AttendanceUpdate>>>,
    pub create_class_response: Mutex<Option<Result<CreatedClassInstance>>>,
    pub job_statuses: Mutex<HashMap<String, VecDeque<Result<JobSnapshot>>>>,
    pub mark_calls: Mutex<Vec<(i64, AttendanceStatus)>>,
    pub subject_fetches: AtomicU32,
    pub instance_fetches: Mutex<Vec<NaiveDate>>,
}

impl FakeAttendanceApi {
    pub fn set_instances(&self, on: NaiveDate, list: Vec<ClassInstance>) {
        self.instances.lock().unwrap().insert(on, list);
    }

    pub fn script_job(&self, job_id: &str, responses: Vec<Result<JobSnapshot>>) {
        self.job_statuses
            .lock()
            .unwrap()
            .insert(job_id.to_string(), responses.into());
    }
}

#[async_trait]
impl AttendanceApi for FakeAttendanceApi {
    async fn subjects(&self) -> Result<Vec<Subject>> {
        self.subject_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.subjects.lock().unwrap().clone())
    }

    async fn create_subject(&self, new_subject: &NewSubject) -> Result<Subject> {
        let mut subjects = self.subjects.lock().unwrap();
        let created = subject(subjects.len() as i64 + 1, &new_subject.name, 0, 0);
        subjects.push(created.clone());
        Ok(created)
    }

    async fn class_instances(&self, date: NaiveDate) -> Result<Vec<ClassInstance>> {
        self.instance_fetches.lock().unwrap().push(date);
        Ok(self
            .instances
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_class_instance(
        &self,
        _instance: &NewClassInstance,
    ) -> Result<CreatedClassInstance> {
        self.create_class_response
            .lock()
            .unwrap()
            .take()
            .expect("create_class_response not scripted")
    }

    async fn mark_attendance(
        &self,
        instance_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceUpdate> {
        self.mark_calls.lock().unwrap().push((instance_id, status));
        self.mark_response
            .lock()
            .unwrap()
            .take()
            .expect("mark_response not scripted")
    }

    async fn calendar_view(&self, _month: u32, _year: i32) -> Result<Vec<CalendarDay>> {
        Ok(self.calendar.lock().unwrap().clone())
    }

    async fn analytics_insights(&self) -> Result<AnalyticsInsights> {
        self.analytics
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| status_error("no analytics scripted"))
    }

    async fn attendance_job_status(&self, job_id: &str) -> Result<JobSnapshot> {
        let next = self
            .job_statuses
            .lock()
            .unwrap()
            .get_mut(job_id)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or_else(|| Ok(pending_snapshot(job_id)))
    }
}

// --- document fake ---

#[derive(Default)]
pub struct FakeDocumentApi {
    pub generate_response: Mutex<Option<Result<GenerationTask>>>,
    pub statuses: Mutex<VecDeque<Result<GenerationTask>>>,
    pub last_status: Mutex<Option<GenerationTask>>,
    pub download_response: Mutex<Option<Result<DocumentDownload>>>,
    pub generate_calls: AtomicU32,
    pub download_calls: AtomicU32,
}

impl FakeDocumentApi {
    pub fn push_status(&self, task: GenerationTask) {
        self.statuses.lock().unwrap().push_back(Ok(task));
    }
}

#[async_trait]
impl DocumentApi for FakeDocumentApi {
    async fn generate_document(&self, _request: &GenerationRequest) -> Result<GenerationTask> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.generate_response
            .lock()
            .unwrap()
            .take()
            .expect("generate_response not scripted")
    }

    async fn generation_status(&self, task_id: &str) -> Result<GenerationTask> {
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(Ok(task)) => {
                *self.last_status.lock().unwrap() = Some(task.clone());
                Ok(task)
            }
            Some(Err(e)) => Err(e),
            // Once the script runs out, keep reporting the last status.
            None => Ok(self
                .last_status
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| generation_task(task_id, "PROCESSING"))),
        }
    }

    async fn download_document(&self, _task_id: &str) -> Result<DocumentDownload> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        self.download_response
            .lock()
            .unwrap()
            .take()
            .expect("download_response not scripted")
    }
}

// --- quiz fake ---

#[derive(Default)]
pub struct FakeQuizApi {
    pub session: Mutex<Option<QuizSessionData>>,
    pub submit_response: Mutex<Option<Result<QuizResult>>>,
    pub submissions: Mutex<Vec<QuizSubmission>>,
    pub history: Mutex<Vec<QuizSummary>>,
    pub generate_calls: AtomicU32,
}

#[async_trait]
impl QuizApi for FakeQuizApi {
    async fn generate_quiz(
        &self,
        _settings: &QuizSettings,
        _source: &QuizSource,
    ) -> Result<QuizSessionData> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.session
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| status_error("no quiz session scripted"))
    }

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<QuizResult> {
        self.submissions.lock().unwrap().push(submission.clone());
        self.submit_response
            .lock()
            .unwrap()
            .take()
            .expect("submit_response not scripted")
    }

    async fn quiz_history(&self) -> Result<Vec<QuizSummary>> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn quiz_session(&self, session_id: i64) -> Result<QuizSessionData> {
        self.session
            .lock()
            .unwrap()
            .clone()
            .filter(|session| session.id == session_id)
            .ok_or_else(|| status_error("Quiz session not found"))
    }
}
