// src/scoring/skills.rs

use std::collections::BTreeMap;

use super::{evaluator::EvaluatedAnswer, exam::Exam, percent, skill::Skill};

/// Per-skill score on a 0-100 scale. Skills with no evaluated answers are absent.
pub type SkillScores = BTreeMap<Skill, u32>;

/// Groups evaluated answers by the skill of their owning section and scores
/// each group as `round(100 * awarded / possible)`.
///
/// Answers are matched to sections by index, so submission order is irrelevant.
/// Answers pointing outside the exam are ignored here; `evaluate` rejects them
/// earlier in the pipeline.
pub fn aggregate_skill_scores(exam: &Exam, evaluated: &[EvaluatedAnswer]) -> SkillScores {
    let mut totals: BTreeMap<Skill, (u64, u64)> = BTreeMap::new();

    for answer in evaluated {
        let Some(section) = exam.sections.get(answer.section_index) else {
            continue;
        };
        let entry = totals.entry(section.skill).or_insert((0, 0));
        entry.0 += u64::from(answer.points_awarded);
        entry.1 += u64::from(answer.points_possible);
    }

    totals
        .into_iter()
        .filter(|(_, (_, possible))| *possible > 0)
        .map(|(skill, (awarded, possible))| (skill, percent(awarded, possible)))
        .collect()
}
