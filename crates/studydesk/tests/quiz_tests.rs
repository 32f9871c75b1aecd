//! Quiz session lifecycle tests: source validation, explicit empty
//! answers on submit, the submit-once rule and history/resume.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{datetime, status_error, FakeQuizApi};
use studydesk::api::types::{
    QuestionResult, QuizQuestion, QuizResult, QuizSessionData, QuizSettings, QuizSource,
    QuizSummary, QUESTION_TYPE_FILL_IN_BLANK, QUESTION_TYPE_MULTIPLE_CHOICE,
};
use studydesk::quiz::QuizController;
use studydesk::ErrorChannel;

fn question(id: i64, question_type: &str) -> QuizQuestion {
    QuizQuestion {
        id,
        question_text: format!("Question {}", id),
        question_type: question_type.to_string(),
        options: None,
    }
}

fn session_data(id: i64) -> QuizSessionData {
    QuizSessionData {
        id,
        status: "in_progress".to_string(),
        questions: vec![
            question(1, QUESTION_TYPE_MULTIPLE_CHOICE),
            question(2, QUESTION_TYPE_FILL_IN_BLANK),
        ],
    }
}

fn graded_result(id: i64) -> QuizResult {
    QuizResult {
        id,
        score: 50.0,
        results: vec![
            QuestionResult {
                question_text: "Question 1".to_string(),
                your_answer: "A".to_string(),
                correct_answer: "A".to_string(),
                is_correct: true,
            },
            QuestionResult {
                question_text: "Question 2".to_string(),
                your_answer: "".to_string(),
                correct_answer: "osmosis".to_string(),
                is_correct: false,
            },
        ],
    }
}

fn controller(api: &Arc<FakeQuizApi>) -> QuizController<FakeQuizApi> {
    QuizController::new(Arc::clone(api), ErrorChannel::new())
}

#[tokio::test]
async fn test_generate_requires_a_source() {
    let api = Arc::new(FakeQuizApi::default());
    let controller = controller(&api);

    let result = controller
        .generate(QuizSettings::default(), QuizSource::Text("   ".to_string()))
        .await;

    assert!(result.is_err());
    assert_eq!(api.generate_calls.load(Ordering::SeqCst), 0);
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn test_generate_creates_in_progress_session() {
    let api = Arc::new(FakeQuizApi::default());
    *api.session.lock().unwrap() = Some(session_data(5));

    let controller = controller(&api);
    controller
        .generate(
            QuizSettings::default(),
            QuizSource::Text("cell biology notes".to_string()),
        )
        .await
        .unwrap();

    let session = controller.session().unwrap();
    assert_eq!(session.id(), 5);
    assert_eq!(session.questions().len(), 2);
    assert!(!session.is_completed());
}

#[tokio::test]
async fn test_submit_sends_explicit_empty_answers() {
    let api = Arc::new(FakeQuizApi::default());
    *api.session.lock().unwrap() = Some(session_data(5));
    *api.submit_response.lock().unwrap() = Some(Ok(graded_result(5)));

    let controller = controller(&api);
    controller
        .generate(
            QuizSettings::default(),
            QuizSource::Document {
                document_id: "doc-1".to_string(),
                tag: "bio".to_string(),
            },
        )
        .await
        .unwrap();
    controller.record_answer(1, "A").unwrap();

    let result = controller.submit().await.unwrap();
    assert_eq!(result.score, 50.0);

    let submissions = api.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].session_id, 5);
    // Both questions are present; the skipped one is an explicit "".
    assert_eq!(submissions[0].answers.len(), 2);
    assert_eq!(submissions[0].answers[0].selected_answer, "A");
    assert_eq!(submissions[0].answers[1].selected_answer, "");
}

#[tokio::test]
async fn test_session_is_terminal_after_submit() {
    let api = Arc::new(FakeQuizApi::default());
    *api.session.lock().unwrap() = Some(session_data(5));
    *api.submit_response.lock().unwrap() = Some(Ok(graded_result(5)));

    let controller = controller(&api);
    controller
        .generate(
            QuizSettings::default(),
            QuizSource::Text("notes".to_string()),
        )
        .await
        .unwrap();
    controller.submit().await.unwrap();

    let session = controller.session().unwrap();
    assert!(session.is_completed());
    // The server's verdicts are stored untouched.
    assert_eq!(session.result().unwrap().results[1].is_correct, false);

    assert!(controller.submit().await.is_err());
    assert!(controller.record_answer(1, "B").is_err());
    assert_eq!(api.submissions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_submit_can_be_retried() {
    let api = Arc::new(FakeQuizApi::default());
    *api.session.lock().unwrap() = Some(session_data(5));
    *api.submit_response.lock().unwrap() = Some(Err(status_error("server unavailable")));

    let controller = controller(&api);
    controller
        .generate(
            QuizSettings::default(),
            QuizSource::Text("notes".to_string()),
        )
        .await
        .unwrap();

    assert!(controller.submit().await.is_err());
    assert!(controller.errors().current().is_some());
    assert!(!controller.session().unwrap().is_completed());

    *api.submit_response.lock().unwrap() = Some(Ok(graded_result(5)));
    assert!(controller.submit().await.is_ok());
    assert_eq!(api.submissions.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_record_answer_rejects_unknown_question() {
    let api = Arc::new(FakeQuizApi::default());
    *api.session.lock().unwrap() = Some(session_data(5));

    let controller = controller(&api);
    controller
        .generate(
            QuizSettings::default(),
            QuizSource::Text("notes".to_string()),
        )
        .await
        .unwrap();

    assert!(controller.record_answer(99, "A").is_err());
}

#[tokio::test]
async fn test_resume_loads_session_by_id() {
    let api = Arc::new(FakeQuizApi::default());
    *api.session.lock().unwrap() = Some(session_data(7));

    let controller = controller(&api);
    controller.resume(7).await.unwrap();
    assert_eq!(controller.session().unwrap().id(), 7);

    assert!(controller.resume(99).await.is_err());
    assert_eq!(
        controller.errors().current(),
        Some("Quiz session not found".to_string())
    );
}

#[tokio::test]
async fn test_history_lists_past_attempts() {
    let api = Arc::new(FakeQuizApi::default());
    *api.history.lock().unwrap() = vec![QuizSummary {
        id: 3,
        created_at: datetime(2026, 2, 10),
        status: "completed".to_string(),
        score: Some(80.0),
        source_document_filename: Some("cells.pdf".to_string()),
    }];

    let controller = controller(&api);
    let history = controller.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, Some(80.0));
}
