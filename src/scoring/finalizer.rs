// src/scoring/finalizer.rs

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    error::ScoringError,
    evaluator::{EvaluatedAnswer, evaluate},
    exam::{Exam, SubmittedAnswer, TestKind},
    feedback::{Feedback, generate_feedback},
    percent,
    placement::{PlacementDecision, PlacementInput, PlacementLayout, RangeCounts, decide},
    skills::{SkillScores, aggregate_skill_scores},
    streak::{correctness_flags, longest_wrong_streak},
};

/// Consolidated scoring output for one submitted attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    pub score: u32,
    pub max_score: u32,
    pub total_correct: u32,
    pub is_passed: bool,
    pub skill_scores: SkillScores,
    pub longest_wrong_streak: usize,
    /// Present only for placement tests.
    pub range_counts: Option<RangeCounts>,
    pub placement: Option<PlacementDecision>,
    pub feedback: Feedback,
    pub answers: Vec<EvaluatedAnswer>,
}

/// Scores a submission against an exam. Pure; persisting the result is the
/// caller's job.
///
/// Every submitted answer is validated before anything is aggregated, so an
/// out-of-range index fails the whole submission. When the same question is
/// answered more than once the last submission counts.
pub fn finalize(
    exam: &Exam,
    layout: &PlacementLayout,
    submission: &[SubmittedAnswer],
) -> Result<PlacementResult, ScoringError> {
    let max_score = exam.max_score()?;

    let mut by_position: BTreeMap<(usize, usize), EvaluatedAnswer> = BTreeMap::new();
    for answer in submission {
        let evaluated = evaluate(exam, answer)?;
        by_position.insert((answer.section_index, answer.question_index), evaluated);
    }
    let answers: Vec<EvaluatedAnswer> = by_position.into_values().collect();

    // Distinct questions only, so the total never exceeds `max_score`.
    let awarded: u32 = answers.iter().map(|a| a.points_awarded).sum();
    let score = percent(u64::from(awarded), u64::from(max_score));
    let is_passed = score >= exam.passing_score;

    let skill_scores = aggregate_skill_scores(exam, &answers);

    let flags = correctness_flags(exam, &answers);
    let total_correct = flags.iter().filter(|&&correct| correct).count() as u32;
    let streak = longest_wrong_streak(&flags);

    let (range_counts, placement) = match exam.kind {
        TestKind::Placement => {
            let counts = layout.range_counts(&flags);
            let decision = decide(
                layout,
                PlacementInput {
                    total_correct,
                    range_counts: &counts,
                    longest_wrong_streak: streak,
                },
                exam.scoring_rubric.as_deref(),
            );
            (Some(counts), Some(decision))
        }
        TestKind::Standard => (None, None),
    };

    Ok(PlacementResult {
        score,
        max_score,
        total_correct,
        is_passed,
        skill_scores,
        longest_wrong_streak: streak,
        range_counts,
        placement,
        feedback: generate_feedback(score, exam.passing_score),
        answers,
    })
}
