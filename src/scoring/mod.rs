// src/scoring/mod.rs

//! CEFR placement scoring.
//!
//! Pure, synchronous pipeline over one submission:
//! evaluate answers, aggregate skill scores, find the longest wrong streak,
//! decide a level and generate feedback. Nothing here touches the database.

pub mod error;
pub mod evaluator;
pub mod exam;
pub mod feedback;
pub mod finalizer;
pub mod level;
pub mod placement;
pub mod skill;
pub mod skills;
pub mod streak;

pub use error::ScoringError;
pub use exam::{Answer, Exam, Question, QuestionType, Section, SubmittedAnswer, TestKind};
pub use finalizer::{PlacementResult, finalize};
pub use level::CefrLevel;
pub use placement::{LevelBand, PlacementLayout, RangeName};
pub use skill::Skill;

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u128::from(part), u128::from(whole));
    ((200 * part + whole) / (2 * whole)) as u32
}
