pub mod grading;
pub mod session;

pub use grading::{grade, AnswerKey, GradedSet};
pub use session::{QuizController, QuizError, QuizSession};
