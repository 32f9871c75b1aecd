//! HTTP client for the dashboard API.
//!
//! One shared `reqwest::Client` with explicit connect and request
//! timeouts; the CSRF token from the session store is attached to every
//! request. Server errors are unwrapped from the `{"detail": ...}`
//! envelope so callers surface the server's own wording.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::{ApiError, Result};
use crate::api::traits::{AttendanceApi, DocumentApi, QuizApi};
use crate::api::types::{
    AnalyticsInsights, AttendanceStatus, AttendanceUpdate, CalendarDay, ClassInstance,
    CreatedClassInstance, DocumentDownload, GenerationRequest, GenerationTask, MoodleAccount,
    NewClassInstance, NewSubject, QuizResult, QuizSessionData, QuizSettings, QuizSource,
    QuizSubmission, QuizSummary, StatJob, Subject,
};
use crate::config::ClientConfig;
use crate::jobs::JobSnapshot;
use crate::session::SessionStore;

const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Serialize)]
struct MarkAttendanceBody {
    status: AttendanceStatus,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.session.csrf_token() {
            builder = builder.header(CSRF_HEADER, token);
        }
        builder
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<Response> {
        let url = self.url(path);
        debug!("Request to {}", url);
        let response = builder.send().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            source: e,
        })?;
        Self::check_status(&url, response).await
    }

    async fn check_status(url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .and_then(|detail| detail.as_str().map(String::from))
            })
            .unwrap_or(body);

        Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(url: String, response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode { url, source: e })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(path, self.request(Method::GET, path)).await?;
        Self::decode(self.url(path), response).await
    }

    async fn get_json_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(path, builder).await?;
        Self::decode(self.url(path), response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(path, builder).await?;
        Self::decode(self.url(path), response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.send(path, builder).await?;
        Self::decode(self.url(path), response).await
    }

    /// Existence probe for the linked Moodle account. A 404 means "not
    /// linked yet", which is an answer, not a failure.
    pub async fn moodle_account(&self) -> Result<Option<MoodleAccount>> {
        not_found_is_none(self.get_json("/moodle/account").await)
    }
}

/// Maps a 404 status error to `Ok(None)` for existence probes.
fn not_found_is_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApiError::Status { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl AttendanceApi for ApiClient {
    async fn subjects(&self) -> Result<Vec<Subject>> {
        self.get_json("/api/subjects").await
    }

    async fn create_subject(&self, subject: &NewSubject) -> Result<Subject> {
        self.post_json("/api/subjects", subject).await
    }

    async fn class_instances(&self, date: NaiveDate) -> Result<Vec<ClassInstance>> {
        self.get_json_query(
            "/api/class-instances",
            &[("target_date", date.to_string())],
        )
        .await
    }

    async fn create_class_instance(
        &self,
        instance: &NewClassInstance,
    ) -> Result<CreatedClassInstance> {
        self.post_json("/api/class-instances", instance).await
    }

    async fn mark_attendance(
        &self,
        instance_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceUpdate> {
        let path = format!("/api/class-instances/{}/attendance", instance_id);
        self.put_json(&path, &MarkAttendanceBody { status }).await
    }

    async fn calendar_view(&self, month: u32, year: i32) -> Result<Vec<CalendarDay>> {
        self.get_json_query(
            "/api/calendar-view",
            &[("month", month.to_string()), ("year", year.to_string())],
        )
        .await
    }

    async fn analytics_insights(&self) -> Result<AnalyticsInsights> {
        self.get_json("/api/analytics-insights").await
    }

    async fn attendance_job_status(&self, job_id: &str) -> Result<JobSnapshot> {
        let path = format!("/api/attendance/job/status/{}", job_id);
        let job: StatJob = self.get_json(&path).await?;
        Ok(JobSnapshot::from_stat_job(&job))
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    async fn generate_document(&self, request: &GenerationRequest) -> Result<GenerationTask> {
        self.post_json("/documents/generate", request).await
    }

    async fn generation_status(&self, task_id: &str) -> Result<GenerationTask> {
        let path = format!("/documents/status/{}", task_id);
        self.get_json(&path).await
    }

    async fn download_document(&self, task_id: &str) -> Result<DocumentDownload> {
        let path = format!("/documents/download/{}", task_id);
        let url = self.url(&path);
        let response = self.send(&path, self.request(Method::GET, &path)).await?;

        let content_disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Decode { url, source: e })?
            .to_vec();

        Ok(DocumentDownload {
            bytes,
            content_disposition,
        })
    }
}

#[async_trait]
impl QuizApi for ApiClient {
    async fn generate_quiz(
        &self,
        settings: &QuizSettings,
        source: &QuizSource,
    ) -> Result<QuizSessionData> {
        let path = "/generate_quiz";
        let settings_json = serde_json::to_string(settings).map_err(ApiError::Encode)?;

        let mut form = reqwest::multipart::Form::new().text("settings_json", settings_json);
        form = match source {
            QuizSource::Document { document_id, tag } => form
                .text("document_id", document_id.clone())
                .text("tag", tag.clone()),
            QuizSource::Text(text) => form.text("text_content", text.clone()),
        };

        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.send(path, builder).await?;
        Self::decode(self.url(path), response).await
    }

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<QuizResult> {
        self.post_json("/quiz/submit", submission).await
    }

    async fn quiz_history(&self) -> Result<Vec<QuizSummary>> {
        self.get_json("/quiz/history").await
    }

    async fn quiz_session(&self, session_id: i64) -> Result<QuizSessionData> {
        let path = format!("/quiz/session/{}", session_id);
        self.get_json(&path).await
    }
}
