// src/handlers/admin.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::{PgPool, types::Json as SqlJson};

use crate::{error::AppError, models::test::CreateTestRequest};

/// Loads a new test.
/// Admin only.
pub async fn create_test(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.check()?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO tests (title, kind, passing_score, sections, scoring_rubric, placement_layout)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(payload.kind.as_str())
    .bind(payload.passing_score as i32)
    .bind(SqlJson(&payload.sections))
    .bind(payload.scoring_rubric.as_ref().map(SqlJson))
    .bind(payload.placement_layout.as_ref().map(SqlJson))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create test: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("Created {} test {} ('{}')", payload.kind, id, payload.title);

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}
