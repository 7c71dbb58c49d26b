// src/scoring/error.rs

use thiserror::Error;

/// Errors raised while scoring a submission.
/// All of them are caller contract violations; nothing is retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("question {question_index} in section {section_index} does not exist")]
    QuestionNotFound {
        section_index: usize,
        question_index: usize,
    },

    #[error("question point values add up to more than can be scored")]
    PointsOverflow,

    #[error("unknown CEFR level '{0}'")]
    UnknownLevel(String),

    #[error("unknown test kind '{0}'")]
    UnknownTestKind(String),
}
