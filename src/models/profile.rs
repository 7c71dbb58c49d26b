// src/models/profile.rs

use serde::Serialize;
use sqlx::{FromRow, types::Json};

use crate::scoring::skills::SkillScores;

/// Represents the 'learner_profiles' table.
/// Skill scores are a running average over completed assessments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearnerProfile {
    pub user_id: i64,
    pub level: Option<String>,
    pub skills: Json<SkillScores>,
    pub assessments_taken: i32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Aggregated profile data for the current learner.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub level: Option<String>,
    pub skills: SkillScores,
    pub assessments_taken: i32,
    pub curriculum_level: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
