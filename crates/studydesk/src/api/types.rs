//! Wire types for the dashboard API.
//!
//! Field names and casing follow the server contract exactly. Status
//! fields of long-running jobs are kept as raw strings here; the
//! translation into the unified job state happens in the adapters in
//! `crate::jobs::state`.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// --- Attendance ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub class_instance_id: i64,
    pub status: AttendanceStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSimple {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// One scheduled occurrence of a class, optionally carrying the
/// attendance already recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInstance {
    pub id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub subject: SubjectSimple,
    #[serde(default)]
    pub attendance_record: Option<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewClassInstance {
    pub subject_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub subject_id: i64,
    pub day: String,
    pub time: NaiveTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSchedule {
    pub day: String,
    pub time: NaiveTime,
}

/// Subject aggregate as returned by the server, including the derived
/// attendance figures the server computes from its own counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub user_id: i64,
    pub total_classes_held: u32,
    pub total_classes_attended: u32,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    pub created_at: NaiveDateTime,
    pub attendance_percentage: f64,
    pub classes_needed_for_75: u32,
    pub bunkable_classes_for_75: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSubject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub schedules: Vec<NewSchedule>,
}

// --- Attendance recalculation jobs ---

/// Server-side statistics job spawned by a mutating attendance request.
/// `status` stays verbatim; see `JobSnapshot::from_stat_job`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatJob {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedClassInstance {
    pub class_instance: ClassInstance,
    pub job: StatJob,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceUpdate {
    pub record: AttendanceRecord,
    pub job: StatJob,
}

// --- Calendar and analytics ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOfWeekStats {
    pub day: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrendPoint {
    pub week_start_date: NaiveDate,
    pub week_label: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsInsights {
    pub attendance_by_day: Vec<DayOfWeekStats>,
    pub weekly_trend: Vec<WeeklyTrendPoint>,
}

// --- Moodle integration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodleAccount {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub batch: String,
    pub auto_sync: bool,
    // Field name reproduces the server contract as-is.
    #[serde(default)]
    pub ast_synced_at: Option<NaiveDateTime>,
}

// --- Document generation ---

/// Static fields of a generated lab document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicDetails {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "UID")]
    pub uid: String,
    #[serde(rename = "Class_and_Batch")]
    pub class_and_batch: String,
    #[serde(rename = "Experiment_No")]
    pub experiment_no: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Aim")]
    pub aim: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub basic_details: BasicDetails,
    pub selected_sections: Vec<String>,
    /// `"single"` or `"multiple"`.
    pub problem_statement_count: String,
}

/// Task handle and status payload for document generation. The create
/// response carries no `error`; the status endpoint fills it on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationTask {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw download payload plus the header the filename is derived from.
#[derive(Debug, Clone)]
pub struct DocumentDownload {
    pub bytes: Vec<u8>,
    pub content_disposition: Option<String>,
}

// --- Quizzes ---

pub const QUESTION_TYPE_MULTIPLE_CHOICE: &str = "Multiple choice";
pub const QUESTION_TYPE_TRUE_FALSE: &str = "True or false";
pub const QUESTION_TYPE_SHORT_RESPONSE: &str = "Short response";
pub const QUESTION_TYPE_FILL_IN_BLANK: &str = "Fill in the blank";
pub const QUESTION_TYPE_ESSAY: &str = "Essay questions";

/// Material a quiz is generated from. A processed document (addressed
/// by id within its tag collection) or raw pasted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    Document { document_id: String, tag: String },
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    pub max_questions: u32,
    pub question_types: Vec<String>,
    pub language: String,
    pub hard_mode: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            max_questions: 20,
            question_types: vec![
                QUESTION_TYPE_MULTIPLE_CHOICE.to_string(),
                QUESTION_TYPE_TRUE_FALSE.to_string(),
                QUESTION_TYPE_SHORT_RESPONSE.to_string(),
                QUESTION_TYPE_FILL_IN_BLANK.to_string(),
            ],
            language: "English".to_string(),
            hard_mode: false,
        }
    }
}

/// A question as served to the client. The correct answer is withheld
/// until submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub question_text: String,
    pub question_type: String,
    /// Option key to label, e.g. `{"A": "...", "B": "..."}`. Null for
    /// free-text question types.
    #[serde(default)]
    pub options: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSessionData {
    pub id: i64,
    pub status: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub status: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub source_document_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: i64,
    pub selected_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub session_id: i64,
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_text: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub score: f64,
    pub results: Vec<QuestionResult>,
}
