// src/scoring/streak.rs

use std::collections::HashMap;

use super::{evaluator::EvaluatedAnswer, exam::Exam};

/// One correctness flag per question in test order.
/// Questions without an evaluated answer count as wrong.
pub fn correctness_flags(exam: &Exam, evaluated: &[EvaluatedAnswer]) -> Vec<bool> {
    let by_position: HashMap<(usize, usize), bool> = evaluated
        .iter()
        .map(|a| ((a.section_index, a.question_index), a.is_correct))
        .collect();

    exam.sections
        .iter()
        .enumerate()
        .flat_map(|(s, section)| (0..section.questions.len()).map(move |q| (s, q)))
        .map(|pos| by_position.get(&pos).copied().unwrap_or(false))
        .collect()
}

/// Length of the longest run of consecutive `false` flags.
pub fn longest_wrong_streak(flags: &[bool]) -> usize {
    let mut current = 0;
    let mut longest = 0;

    for &correct in flags {
        if correct {
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }

    longest
}
