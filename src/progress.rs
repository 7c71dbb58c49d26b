// src/progress.rs

//! Best-effort propagation of a scored attempt into the learner's profile and
//! curriculum. Failures are logged and never reach the learner.

use sqlx::{PgPool, types::Json};

use crate::{
    config::CURRICULUM_ADVANCE_SCORE,
    error::AppError,
    scoring::{CefrLevel, PlacementResult, skills::SkillScores},
};

/// Applies a finished attempt to the learner's profile and curriculum.
pub async fn record_result(pool: &PgPool, user_id: i64, result: &PlacementResult) {
    let level = result.placement.map(|p| p.recommended_level);

    if let Err(e) = update_profile(pool, user_id, level, &result.skill_scores).await {
        tracing::warn!("Failed to update profile for user {}: {:?}", user_id, e);
    }

    if let Err(e) = update_curriculum(pool, user_id, result.score, level).await {
        tracing::warn!("Failed to update curriculum for user {}: {:?}", user_id, e);
    }
}

/// Averages new skill scores into the existing ones, rounding halves up.
/// Skills seen for the first time are taken as is.
pub fn blend_skill_scores(previous: Option<&SkillScores>, latest: &SkillScores) -> SkillScores {
    let mut blended = previous.cloned().unwrap_or_default();
    for (&skill, &score) in latest {
        blended
            .entry(skill)
            .and_modify(|old| *old = (*old + score + 1) / 2)
            .or_insert(score);
    }
    blended
}

/// Decides the curriculum level after an attempt.
/// Returns `None` when the stored level should stay as it is.
pub fn next_curriculum_level(
    current: Option<CefrLevel>,
    score: u32,
    placement: Option<CefrLevel>,
) -> Option<CefrLevel> {
    match current {
        Some(level) if score >= CURRICULUM_ADVANCE_SCORE && level != CefrLevel::C2 => {
            Some(level.promote())
        }
        Some(_) => None,
        None => placement,
    }
}

async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    level: Option<CefrLevel>,
    skills: &SkillScores,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    // The row must exist before it can be locked.
    sqlx::query("INSERT INTO learner_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let (previous,): (Json<SkillScores>,) =
        sqlx::query_as("SELECT skills FROM learner_profiles WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

    let blended = blend_skill_scores(Some(&previous.0), skills);

    sqlx::query(
        r#"
        UPDATE learner_profiles SET
            level = COALESCE($2, level),
            skills = $3,
            assessments_taken = assessments_taken + 1,
            updated_at = CURRENT_TIMESTAMP
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(level.map(|l| l.to_string()))
    .bind(Json(&blended))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

async fn update_curriculum(
    pool: &PgPool,
    user_id: i64,
    score: u32,
    placement: Option<CefrLevel>,
) -> Result<(), AppError> {
    let current: Option<(String,)> =
        sqlx::query_as("SELECT current_level FROM curricula WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let current = current
        .map(|(level,)| level.parse::<CefrLevel>())
        .transpose()?;

    let Some(next) = next_curriculum_level(current, score, placement) else {
        return Ok(());
    };

    sqlx::query(
        r#"
        INSERT INTO curricula (user_id, current_level)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET
            current_level = EXCLUDED.current_level,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(user_id)
    .bind(next.to_string())
    .execute(pool)
    .await?;

    tracing::info!("Curriculum for user {} moved to {}", user_id, next);
    Ok(())
}
