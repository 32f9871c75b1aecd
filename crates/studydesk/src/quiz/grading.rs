//! Quiz grading.
//!
//! This is the client-observable contract of quiz submission: choice
//! questions (multiple choice, true/false) are graded by exact,
//! case-sensitive comparison of the selected option key; free-text
//! answers are compared lowercased and trimmed. A question left
//! unanswered grades as an explicit empty answer, never as a skip.

use std::collections::HashMap;

use crate::api::types::{
    QuestionResult, QUESTION_TYPE_MULTIPLE_CHOICE, QUESTION_TYPE_TRUE_FALSE,
};

/// A question together with its correct answer, as known at grading
/// time.
#[derive(Debug, Clone)]
pub struct AnswerKey {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: String,
    pub correct_answer: String,
}

/// Graded outcome of one quiz submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedSet {
    /// Percentage score, rounded to two decimals. Zero for an empty
    /// question set.
    pub score: f64,
    pub correct_count: u32,
    pub results: Vec<QuestionResult>,
}

fn is_choice_type(question_type: &str) -> bool {
    question_type == QUESTION_TYPE_MULTIPLE_CHOICE || question_type == QUESTION_TYPE_TRUE_FALSE
}

fn is_correct(question_type: &str, user_answer: &str, correct_answer: &str) -> bool {
    if is_choice_type(question_type) {
        user_answer == correct_answer
    } else {
        user_answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
    }
}

/// Grades `answers` against `questions`. Deterministic and pure;
/// results come back in question order.
pub fn grade(questions: &[AnswerKey], answers: &HashMap<i64, String>) -> GradedSet {
    let mut correct_count = 0u32;
    let mut results = Vec::with_capacity(questions.len());

    for question in questions {
        let user_answer = answers
            .get(&question.question_id)
            .cloned()
            .unwrap_or_default();
        let correct = is_correct(&question.question_type, &user_answer, &question.correct_answer);
        if correct {
            correct_count += 1;
        }
        results.push(QuestionResult {
            question_text: question.question_text.clone(),
            your_answer: user_answer,
            correct_answer: question.correct_answer.clone(),
            is_correct: correct,
        });
    }

    let score = if questions.is_empty() {
        0.0
    } else {
        let raw = correct_count as f64 / questions.len() as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    };

    GradedSet {
        score,
        correct_count,
        results,
    }
}
