// src/scoring/evaluator.rs

use serde::Serialize;

use super::{
    error::ScoringError,
    exam::{Answer, Exam, SubmittedAnswer},
};

/// Outcome of checking one submitted answer against its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedAnswer {
    pub section_index: usize,
    pub question_index: usize,
    pub is_correct: bool,
    pub points_awarded: u32,
    pub points_possible: u32,
}

/// Compares a submission with an answer key.
///
/// * list vs list: same length and every submitted value appears in the key.
/// * scalar vs list: the key contains the scalar.
/// * scalar vs scalar: exact match.
///
/// A list submitted against a scalar key is never correct.
pub fn is_correct(submitted: &Answer, key: &Answer) -> bool {
    match (submitted, key) {
        (Answer::Many(values), Answer::Many(accepted)) => {
            values.len() == accepted.len() && values.iter().all(|v| accepted.contains(v))
        }
        (Answer::One(value), Answer::Many(accepted)) => accepted.contains(value),
        (Answer::One(value), Answer::One(expected)) => value == expected,
        (Answer::Many(_), Answer::One(_)) => false,
    }
}

/// Evaluates one submitted answer. All-or-nothing: the question's points or 0.
pub fn evaluate(exam: &Exam, answer: &SubmittedAnswer) -> Result<EvaluatedAnswer, ScoringError> {
    let question = exam
        .question(answer.section_index, answer.question_index)
        .ok_or(ScoringError::QuestionNotFound {
            section_index: answer.section_index,
            question_index: answer.question_index,
        })?;

    let correct = is_correct(&answer.student_answer, &question.answer);

    Ok(EvaluatedAnswer {
        section_index: answer.section_index,
        question_index: answer.question_index,
        is_correct: correct,
        points_awarded: if correct { question.points } else { 0 },
        points_possible: question.points,
    })
}
