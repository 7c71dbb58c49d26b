// src/models/attempt.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::{
    error::AppError,
    scoring::{
        Answer, CefrLevel, PlacementResult, SubmittedAnswer,
        evaluator::EvaluatedAnswer,
        feedback::Feedback,
        placement::RangeCounts,
        skills::SkillScores,
    },
};

/// Represents the 'test_attempts' table in the database.
/// Written once at submission time and read-only afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub test_id: i64,
    /// 'in_progress' or 'completed'.
    pub status: String,
    pub answers: Json<Vec<StoredAnswer>>,
    pub score: Option<i32>,
    pub max_score: i32,
    pub time_spent: Option<i32>,
    pub is_completed: bool,
    pub is_passed: Option<bool>,
    pub skills: Json<SkillScores>,
    pub feedback: Option<Json<Feedback>>,
    pub recommended_level: Option<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Attempt {
    /// Checks ownership, then completion, and only then the request body.
    pub fn check_submittable(&self, user_id: i64, req: &SubmitAttemptRequest) -> Result<(), AppError> {
        if self.user_id != user_id {
            return Err(AppError::Forbidden(
                "Attempt belongs to another user".to_string(),
            ));
        }
        if self.is_completed {
            return Err(AppError::Conflict("Attempt already submitted".to_string()));
        }
        req.validate()
            .map_err(|validation_errors| AppError::BadRequest(validation_errors.to_string()))
    }
}

/// A submitted answer together with how it was scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnswer {
    pub section_index: usize,
    pub question_index: usize,
    pub student_answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
    pub is_correct: bool,
    pub points_awarded: u32,
}

impl StoredAnswer {
    /// Pairs the last submission for each question with its evaluation.
    /// `evaluated` comes from `finalize`, which orders by (section, question).
    pub fn collect(submitted: &[SubmittedAnswer], evaluated: &[EvaluatedAnswer]) -> Vec<Self> {
        let latest: BTreeMap<(usize, usize), &SubmittedAnswer> = submitted
            .iter()
            .map(|a| ((a.section_index, a.question_index), a))
            .collect();

        evaluated
            .iter()
            .filter_map(|e| {
                latest
                    .get(&(e.section_index, e.question_index))
                    .map(|a| StoredAnswer {
                        section_index: e.section_index,
                        question_index: e.question_index,
                        student_answer: a.student_answer.clone(),
                        time_spent: a.time_spent,
                        is_correct: e.is_correct,
                        points_awarded: e.points_awarded,
                    })
            })
            .collect()
    }
}

/// DTO for submitting an attempt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    #[validate(length(max = 500))]
    pub answers: Vec<SubmittedAnswer>,
    /// Total seconds spent on the test.
    #[validate(range(max = 86_400))]
    pub time_spent: u32,
}

/// DTO returned after a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptResponse {
    pub score: u32,
    pub max_score: u32,
    pub total_correct: u32,
    pub is_passed: bool,
    pub recommended_level: Option<CefrLevel>,
    pub section_scores: Option<RangeCounts>,
    pub tie_break_applied: bool,
    pub has_long_wrong_streak: bool,
    pub feedback: Feedback,
    pub skill_scores: SkillScores,
}

impl From<&PlacementResult> for SubmitAttemptResponse {
    fn from(result: &PlacementResult) -> Self {
        Self {
            score: result.score,
            max_score: result.max_score,
            total_correct: result.total_correct,
            is_passed: result.is_passed,
            recommended_level: result.placement.map(|p| p.recommended_level),
            section_scores: result.range_counts.clone(),
            tie_break_applied: result.placement.is_some_and(|p| p.tie_break_applied),
            has_long_wrong_streak: result.placement.is_some_and(|p| p.has_long_wrong_streak),
            feedback: result.feedback.clone(),
            skill_scores: result.skill_scores.clone(),
        }
    }
}

/// DTO returned when an attempt is started.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptResponse {
    pub attempt_id: i64,
    pub test_id: i64,
    pub max_score: i32,
    pub status: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}
