// src/scoring/exam.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{error::ScoringError, placement::LevelBand, skill::Skill};

/// Largest point value a single question may carry.
pub const MAX_QUESTION_POINTS: u32 = 1000;

/// Largest number of questions a single test may hold.
pub const MAX_TEST_QUESTIONS: usize = 500;

/// Whether a test produces a recommended level or only a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Placement,
    Standard,
}

impl TestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Placement => "placement",
            TestKind::Standard => "standard",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placement" => Ok(TestKind::Placement),
            "standard" => Ok(TestKind::Standard),
            other => Err(ScoringError::UnknownTestKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Single,
    Multiple,
    TrueFalse,
    FillBlank,
}

/// A submitted answer or an answer key: one value, or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub points: u32,
    pub answer: Answer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub skill: Skill,
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

/// Scoring view of a seeded test. Section and question order are fixed.
#[derive(Debug, Clone)]
pub struct Exam {
    pub kind: TestKind,
    pub passing_score: u32,
    pub sections: Vec<Section>,
    pub scoring_rubric: Option<Vec<LevelBand>>,
}

impl Exam {
    pub fn question(&self, section_index: usize, question_index: usize) -> Option<&Question> {
        self.sections
            .get(section_index)
            .and_then(|s| s.questions.get(question_index))
    }

    /// Sum of every question's point value. Fails instead of wrapping.
    pub fn max_score(&self) -> Result<u32, ScoringError> {
        self.sections
            .iter()
            .flat_map(|s| s.questions.iter())
            .try_fold(0u32, |total, q| {
                total.checked_add(q.points).ok_or(ScoringError::PointsOverflow)
            })
    }
}

/// One answer as submitted by the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub section_index: usize,
    pub question_index: usize,
    pub student_answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}
