// src/handlers/assessment.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, types::Json as SqlJson};

use crate::{
    error::AppError,
    models::{
        attempt::{
            Attempt, StartAttemptResponse, StoredAnswer, SubmitAttemptRequest,
            SubmitAttemptResponse,
        },
        test::TestRecord,
    },
    progress,
    scoring::{PlacementLayout, finalize},
    utils::jwt::Claims,
};

pub(crate) async fn fetch_test(pool: &PgPool, id: i64) -> Result<TestRecord, AppError> {
    sqlx::query_as::<_, TestRecord>(
        r#"
        SELECT id, title, kind, passing_score, sections, scoring_rubric, placement_layout, created_at
        FROM tests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Test not found".to_string()))
}

async fn fetch_attempt(pool: &PgPool, id: i64) -> Result<Attempt, AppError> {
    sqlx::query_as::<_, Attempt>(
        r#"
        SELECT
            id, user_id, test_id, status, answers, score, max_score, time_spent,
            is_completed, is_passed, skills, feedback, recommended_level,
            started_at, completed_at
        FROM test_attempts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))
}

/// Returns a test without its answer keys.
pub async fn get_test(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let test = fetch_test(&pool, id).await?;
    Ok(Json(test.to_public()))
}

/// Starts a new attempt for the current learner.
pub async fn start_attempt(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(test_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let exam = fetch_test(&pool, test_id).await?.to_exam()?;

    let max_score = i32::try_from(exam.max_score()?)
        .map_err(|_| AppError::InternalServerError(format!("test {} max score overflows", test_id)))?;

    let started = sqlx::query_as::<_, StartAttemptResponse>(
        r#"
        INSERT INTO test_attempts (user_id, test_id, status, max_score)
        VALUES ($1, $2, 'in_progress', $3)
        RETURNING id as attempt_id, test_id, max_score, status, started_at
        "#,
    )
    .bind(user_id)
    .bind(test_id)
    .bind(max_score)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to start attempt: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        "User {} started attempt {} on test {}",
        user_id,
        started.attempt_id,
        test_id
    );

    Ok((StatusCode::CREATED, Json(started)))
}

/// Returns an attempt. Only its owner or an admin may read it.
pub async fn get_attempt(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let attempt = fetch_attempt(&pool, attempt_id).await?;

    if attempt.user_id != user_id && claims.role != "admin" {
        return Err(AppError::Forbidden(
            "Attempt belongs to another user".to_string(),
        ));
    }

    Ok(Json(attempt))
}

/// Scores a submitted attempt and stores the result.
///
/// * Only the attempt owner may submit, and only once.
/// * Scoring is pure; the attempt row is written in a single conditional
///   update once everything has been computed.
/// * Profile and curriculum updates run afterwards and never fail the request.
pub async fn submit_attempt(
    State(pool): State<PgPool>,
    State(default_layout): State<Arc<PlacementLayout>>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<i64>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let attempt = fetch_attempt(&pool, attempt_id).await?;
    attempt.check_submittable(user_id, &req)?;

    let test = fetch_test(&pool, attempt.test_id).await?;
    let exam = test.to_exam()?;
    let layout = test.layout().unwrap_or(default_layout.as_ref());

    let result = finalize(&exam, layout, &req.answers)?;
    let stored = StoredAnswer::collect(&req.answers, &result.answers);
    let recommended_level = result.placement.map(|p| p.recommended_level);

    let updated = sqlx::query(
        r#"
        UPDATE test_attempts SET
            status = 'completed',
            answers = $2,
            score = $3,
            time_spent = $4,
            is_completed = TRUE,
            is_passed = $5,
            skills = $6,
            feedback = $7,
            recommended_level = $8,
            completed_at = CURRENT_TIMESTAMP
        WHERE id = $1 AND is_completed = FALSE
        "#,
    )
    .bind(attempt_id)
    .bind(SqlJson(&stored))
    .bind(result.score as i32)
    .bind(req.time_spent as i32)
    .bind(result.is_passed)
    .bind(SqlJson(&result.skill_scores))
    .bind(SqlJson(&result.feedback))
    .bind(recommended_level.map(|l| l.to_string()))
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store attempt {}: {:?}", attempt_id, e);
        AppError::from(e)
    })?;

    // Lost a race with a concurrent submission of the same attempt.
    if updated.rows_affected() == 0 {
        return Err(AppError::Conflict("Attempt already submitted".to_string()));
    }

    tracing::info!(
        "Attempt {} submitted by user {}: score={} correct={} level={:?}",
        attempt_id,
        user_id,
        result.score,
        result.total_correct,
        recommended_level
    );

    progress::record_result(&pool, user_id, &result).await;

    Ok(Json(SubmitAttemptResponse::from(&result)))
}
