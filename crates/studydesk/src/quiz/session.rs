//! Quiz session lifecycle.
//!
//! A session is created on generate, mutated locally while the user
//! answers, and submitted exactly once. After submission it is terminal
//! read-only history carrying the server's graded result; the
//! `is_correct` verdicts are rendered exactly as returned.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::alert::ErrorChannel;
use crate::api::types::{
    QuizQuestion, QuizResult, QuizSessionData, QuizSettings, QuizSource, QuizSubmission,
    QuizSummary, UserAnswer,
};
use crate::api::QuizApi;
use crate::error::Result;

pub const SESSION_IN_PROGRESS: &str = "in_progress";
pub const SESSION_COMPLETED: &str = "completed";

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No quiz is in progress")]
    NoActiveSession,

    #[error("This quiz has already been completed")]
    AlreadyCompleted,

    #[error("Provide a document or some text to generate a quiz from")]
    EmptySource,

    #[error("Question {0} is not part of this quiz")]
    UnknownQuestion(i64),
}

/// One quiz attempt with its locally recorded answers.
#[derive(Debug, Clone)]
pub struct QuizSession {
    data: QuizSessionData,
    answers: HashMap<i64, String>,
    result: Option<QuizResult>,
    submitting: bool,
}

impl QuizSession {
    fn new(data: QuizSessionData) -> Self {
        Self {
            data,
            answers: HashMap::new(),
            result: None,
            submitting: false,
        }
    }

    pub fn id(&self) -> i64 {
        self.data.id
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.data.questions
    }

    pub fn answer(&self, question_id: i64) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_some() || self.data.status == SESSION_COMPLETED
    }

    /// The server's graded result, present once submitted.
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }
}

pub struct QuizController<Q: QuizApi + 'static> {
    api: Arc<Q>,
    errors: ErrorChannel,
    session: Arc<RwLock<Option<QuizSession>>>,
}

impl<Q: QuizApi + 'static> QuizController<Q> {
    pub fn new(api: Arc<Q>, errors: ErrorChannel) -> Self {
        Self {
            api,
            errors,
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// Clone of the current session, if one exists.
    pub fn session(&self) -> Option<QuizSession> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Generates a new quiz from a document or pasted text, replacing
    /// any previous session. At least one non-empty source is required.
    pub async fn generate(&self, settings: QuizSettings, source: QuizSource) -> Result<()> {
        validate_source(&source)?;

        match self.api.generate_quiz(&settings, &source).await {
            Ok(data) => {
                self.write_session(|slot| *slot = Some(QuizSession::new(data)));
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Records an answer locally. Rejected once the session has been
    /// submitted.
    pub fn record_answer(&self, question_id: i64, answer: impl Into<String>) -> Result<()> {
        let mut slot = self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let session = slot.as_mut().ok_or(QuizError::NoActiveSession)?;
        if session.is_completed() || session.submitting {
            return Err(QuizError::AlreadyCompleted.into());
        }
        if !session.data.questions.iter().any(|q| q.id == question_id) {
            return Err(QuizError::UnknownQuestion(question_id).into());
        }
        session.answers.insert(question_id, answer.into());
        Ok(())
    }

    /// Submits the session for grading. Every question is answered
    /// explicitly, with an empty string standing in for anything the
    /// user skipped. A session submits at most once; the attempt is
    /// reopened only if the request itself fails.
    pub async fn submit(&self) -> Result<QuizResult> {
        let submission = {
            let mut slot = self
                .session
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let session = slot.as_mut().ok_or(QuizError::NoActiveSession)?;
            if session.is_completed() || session.submitting {
                return Err(QuizError::AlreadyCompleted.into());
            }
            session.submitting = true;

            QuizSubmission {
                session_id: session.data.id,
                answers: session
                    .data
                    .questions
                    .iter()
                    .map(|question| UserAnswer {
                        question_id: question.id,
                        selected_answer: session
                            .answers
                            .get(&question.id)
                            .cloned()
                            .unwrap_or_default(),
                    })
                    .collect(),
            }
        };

        match self.api.submit_quiz(&submission).await {
            Ok(result) => {
                self.write_session(|slot| {
                    if let Some(session) = slot.as_mut() {
                        session.data.status = SESSION_COMPLETED.to_string();
                        session.result = Some(result.clone());
                        session.submitting = false;
                    }
                });
                Ok(result)
            }
            Err(e) => {
                self.write_session(|slot| {
                    if let Some(session) = slot.as_mut() {
                        session.submitting = false;
                    }
                });
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Past quiz attempts, newest first as the server returns them.
    pub async fn history(&self) -> Result<Vec<QuizSummary>> {
        match self.api.quiz_history().await {
            Ok(history) => Ok(history),
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Loads an existing session by id, typically to continue an
    /// in-progress attempt from the history list.
    pub async fn resume(&self, session_id: i64) -> Result<()> {
        match self.api.quiz_session(session_id).await {
            Ok(data) => {
                self.write_session(|slot| *slot = Some(QuizSession::new(data)));
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    fn write_session(&self, mutate: impl FnOnce(&mut Option<QuizSession>)) {
        let mut slot = self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        mutate(&mut slot);
    }
}

fn validate_source(source: &QuizSource) -> std::result::Result<(), QuizError> {
    match source {
        QuizSource::Document { document_id, tag } => {
            if document_id.trim().is_empty() || tag.trim().is_empty() {
                return Err(QuizError::EmptySource);
            }
        }
        QuizSource::Text(text) => {
            if text.trim().is_empty() {
                return Err(QuizError::EmptySource);
            }
        }
    }
    Ok(())
}
