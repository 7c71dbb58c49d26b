use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::profile::{LearnerProfile, MeResponse},
    utils::jwt::Claims,
};

/// Get the current learner's level, running skill scores and curriculum level.
pub async fn get_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let profile = sqlx::query_as::<_, LearnerProfile>(
        r#"
        SELECT user_id, level, skills, assessments_taken, updated_at
        FROM learner_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("No assessment results yet".to_string()))?;

    let curriculum_level: Option<(String,)> =
        sqlx::query_as("SELECT current_level FROM curricula WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;

    Ok(Json(MeResponse {
        user_id: profile.user_id,
        level: profile.level,
        skills: profile.skills.0,
        assessments_taken: profile.assessments_taken,
        curriculum_level: curriculum_level.map(|(level,)| level),
        updated_at: profile.updated_at,
    }))
}
