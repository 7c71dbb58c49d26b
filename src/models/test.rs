// src/models/test.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::{
    error::AppError,
    scoring::{
        Exam, LevelBand, PlacementLayout, QuestionType, Section, Skill, TestKind,
        exam::{MAX_QUESTION_POINTS, MAX_TEST_QUESTIONS},
    },
};

/// Represents the 'tests' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct TestRecord {
    pub id: i64,

    pub title: String,

    /// 'placement' or 'standard'.
    pub kind: String,

    /// Percentage needed to pass.
    pub passing_score: i32,

    /// Ordered sections with their questions and answer keys.
    pub sections: Json<Vec<Section>>,

    /// Explicit total-correct to level bands. Overrides the layout when present.
    pub scoring_rubric: Option<Json<Vec<LevelBand>>>,

    /// Range and boundary configuration; the standard 50-question layout when NULL.
    pub placement_layout: Option<Json<PlacementLayout>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TestRecord {
    /// Builds the scoring view of this test.
    pub fn to_exam(&self) -> Result<Exam, AppError> {
        let kind = self.kind.parse::<TestKind>().map_err(|e| {
            AppError::InternalServerError(format!("test {}: {}", self.id, e))
        })?;
        let passing_score = u32::try_from(self.passing_score).map_err(|_| {
            AppError::InternalServerError(format!(
                "test {}: negative passing score {}",
                self.id, self.passing_score
            ))
        })?;

        Ok(Exam {
            kind,
            passing_score,
            sections: self.sections.0.clone(),
            scoring_rubric: self.scoring_rubric.as_ref().map(|r| r.0.clone()),
        })
    }

    pub fn layout(&self) -> Option<&PlacementLayout> {
        self.placement_layout.as_ref().map(|l| &l.0)
    }

    /// Learner-facing view with answer keys stripped.
    pub fn to_public(&self) -> PublicTest {
        PublicTest {
            id: self.id,
            title: self.title.clone(),
            kind: self.kind.clone(),
            passing_score: self.passing_score,
            sections: self
                .sections
                .0
                .iter()
                .map(|section| PublicSection {
                    skill: section.skill,
                    title: section.title.clone(),
                    questions: section
                        .questions
                        .iter()
                        .map(|q| PublicQuestion {
                            question_type: q.question_type,
                            prompt: q.prompt.clone(),
                            options: q.options.clone(),
                            points: q.points,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// DTO for sending a test to the learner (excludes answer keys and rubric).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTest {
    pub id: i64,
    pub title: String,
    pub kind: String,
    pub passing_score: i32,
    pub sections: Vec<PublicSection>,
}

#[derive(Debug, Serialize)]
pub struct PublicSection {
    pub skill: Skill,
    pub title: Option<String>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: u32,
}

/// DTO for loading a new test.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub kind: TestKind,
    #[validate(range(max = 100))]
    pub passing_score: u32,
    #[validate(custom(function = validate_sections))]
    pub sections: Vec<Section>,
    pub scoring_rubric: Option<Vec<LevelBand>>,
    pub placement_layout: Option<PlacementLayout>,
}

impl CreateTestRequest {
    /// Runs field validation plus the checks that span optional fields.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if let Some(rubric) = &self.scoring_rubric {
            validate_rubric(rubric).map_err(|e| AppError::BadRequest(e.to_string()))?;
        }

        if let Some(layout) = &self.placement_layout {
            if layout
                .ranges
                .iter()
                .any(|r| r.start_index == 0 || r.start_index > r.end_index)
            {
                return Err(AppError::BadRequest(
                    "placement ranges must be 1-based with start <= end".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Every section needs questions, and every question a point value in
/// `1..=MAX_QUESTION_POINTS`. The question count is capped so the maximum
/// score always fits the attempt's score columns.
fn validate_sections(sections: &[Section]) -> Result<(), validator::ValidationError> {
    if sections.is_empty() {
        return Err(validator::ValidationError::new("sections_cannot_be_empty"));
    }
    for section in sections {
        if section.questions.is_empty() {
            return Err(validator::ValidationError::new("section_without_questions"));
        }
        if section
            .questions
            .iter()
            .any(|q| !(1..=MAX_QUESTION_POINTS).contains(&q.points))
        {
            return Err(validator::ValidationError::new("points_out_of_range"));
        }
    }
    let question_count: usize = sections.iter().map(|s| s.questions.len()).sum();
    if question_count > MAX_TEST_QUESTIONS {
        return Err(validator::ValidationError::new("too_many_questions"));
    }
    Ok(())
}

/// Bands must be well formed and must not overlap.
fn validate_rubric(rubric: &[LevelBand]) -> Result<(), validator::ValidationError> {
    if rubric.iter().any(|b| b.min > b.max) {
        return Err(validator::ValidationError::new("rubric_band_min_above_max"));
    }

    let mut bands = rubric.to_vec();
    bands.sort_by_key(|b| b.min);
    if bands.windows(2).any(|w| w[1].min <= w[0].max) {
        return Err(validator::ValidationError::new("rubric_bands_overlap"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Answer, CefrLevel, Question};

    fn section(points: u32) -> Section {
        Section {
            skill: Skill::Reading,
            title: Some("Part 1".into()),
            questions: vec![Question {
                question_type: QuestionType::Single,
                prompt: "Where does Anna live?".into(),
                options: vec!["Paris".into(), "Rome".into()],
                points,
                answer: Answer::One("Rome".into()),
            }],
        }
    }

    fn record() -> TestRecord {
        TestRecord {
            id: 7,
            title: "Placement".into(),
            kind: "placement".into(),
            passing_score: 60,
            sections: Json(vec![section(2)]),
            scoring_rubric: None,
            placement_layout: None,
            created_at: None,
        }
    }

    #[test]
    fn test_public_view_hides_answers() {
        let json = serde_json::to_value(record().to_public()).unwrap();
        let question = &json["sections"][0]["questions"][0];
        assert_eq!(question["prompt"], "Where does Anna live?");
        assert_eq!(question["type"], "single");
        assert!(question.get("answer").is_none());
        assert_eq!(json["passingScore"], 60);
    }

    #[test]
    fn test_to_exam() {
        let exam = record().to_exam().unwrap();
        assert_eq!(exam.kind, TestKind::Placement);
        assert_eq!(exam.max_score(), Ok(2));

        let mut broken = record();
        broken.kind = "quiz".into();
        assert!(broken.to_exam().is_err());
    }

    #[test]
    fn test_create_request_checks() {
        let request = CreateTestRequest {
            title: "Placement".into(),
            kind: TestKind::Placement,
            passing_score: 60,
            sections: vec![section(1)],
            scoring_rubric: Some(vec![
                LevelBand { min: 0, max: 29, level: CefrLevel::B1 },
                LevelBand { min: 30, max: 60, level: CefrLevel::B2 },
            ]),
            placement_layout: None,
        };
        assert!(request.check().is_ok());

        let zero_points = CreateTestRequest {
            sections: vec![section(0)],
            ..request
        };
        assert!(zero_points.check().is_err());
    }

    #[test]
    fn test_point_values_are_bounded() {
        assert!(validate_sections(&[section(MAX_QUESTION_POINTS)]).is_ok());
        assert!(validate_sections(&[section(MAX_QUESTION_POINTS + 1)]).is_err());
        assert!(validate_sections(&[section(u32::MAX), section(2)]).is_err());

        let too_many = vec![section(1); MAX_TEST_QUESTIONS + 1];
        assert!(validate_sections(&too_many).is_err());
    }

    #[test]
    fn test_overlapping_rubric_is_rejected() {
        let rubric = [
            LevelBand { min: 0, max: 30, level: CefrLevel::B1 },
            LevelBand { min: 30, max: 60, level: CefrLevel::B2 },
        ];
        assert!(validate_rubric(&rubric).is_err());
    }
}
