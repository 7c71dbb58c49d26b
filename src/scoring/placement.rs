// src/scoring/placement.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::level::CefrLevel;

/// Named slice of the global question sequence used for boundary signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeName {
    GrammarUse,
    Vocabulary,
    Reading,
    Advanced,
}

/// Inclusive 1-based range of global question positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRange {
    pub name: RangeName,
    pub start_index: usize,
    pub end_index: usize,
}

/// Maps an inclusive band of correct-answer counts to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBand {
    pub min: u32,
    pub max: u32,
    pub level: CefrLevel,
}

impl LevelBand {
    pub fn contains(&self, count: u32) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Comparison applied to a range count. Both forms are kept as written in the
/// exam definition even where they are numerically equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    GreaterThan(u32),
    AtLeast(u32),
}

impl Threshold {
    pub fn is_met(self, count: u32) -> bool {
        match self {
            Threshold::GreaterThan(n) => count > n,
            Threshold::AtLeast(n) => count >= n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub range: RangeName,
    pub threshold: Threshold,
}

/// Promotion rule evaluated when the total lands exactly on `boundary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakRule {
    pub boundary: u32,
    pub signals: Vec<Signal>,
    pub min_signals: usize,
}

impl TieBreakRule {
    fn signals_met(&self, counts: &RangeCounts) -> usize {
        self.signals
            .iter()
            .filter(|s| s.threshold.is_met(counts.get(&s.range).copied().unwrap_or(0)))
            .count()
    }
}

pub type RangeCounts = BTreeMap<RangeName, u32>;

/// Everything the decision procedure needs to know about an exam layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementLayout {
    pub ranges: Vec<ScoreRange>,
    pub buckets: Vec<LevelBand>,
    pub tie_breaks: Vec<TieBreakRule>,
    pub streak_threshold: usize,
}

fn rule(boundary: u32, signals: [(RangeName, Threshold); 4]) -> TieBreakRule {
    TieBreakRule {
        boundary,
        signals: signals
            .into_iter()
            .map(|(range, threshold)| Signal { range, threshold })
            .collect(),
        min_signals: 2,
    }
}

impl PlacementLayout {
    /// The 50-question placement exam: grammar/use 1-20, vocabulary 21-30,
    /// reading 31-40, advanced 41-50.
    pub fn standard() -> Self {
        use RangeName::*;
        use Threshold::*;

        let band = |min, max, level| LevelBand { min, max, level };

        Self {
            ranges: vec![
                ScoreRange { name: GrammarUse, start_index: 1, end_index: 20 },
                ScoreRange { name: Vocabulary, start_index: 21, end_index: 30 },
                ScoreRange { name: Reading, start_index: 31, end_index: 40 },
                ScoreRange { name: Advanced, start_index: 41, end_index: 50 },
            ],
            buckets: vec![
                band(0, 10, CefrLevel::A1),
                band(11, 20, CefrLevel::A2),
                band(21, 30, CefrLevel::B1),
                band(31, 40, CefrLevel::B2),
                band(41, 46, CefrLevel::C1),
                band(47, 50, CefrLevel::C2),
            ],
            tie_breaks: vec![
                rule(10, [
                    (Reading, GreaterThan(4)),
                    (GrammarUse, GreaterThan(10)),
                    (Vocabulary, GreaterThan(4)),
                    (Advanced, GreaterThan(3)),
                ]),
                rule(20, [
                    (Reading, AtLeast(6)),
                    (GrammarUse, AtLeast(11)),
                    (Vocabulary, AtLeast(6)),
                    (Advanced, AtLeast(4)),
                ]),
                rule(30, [
                    (Reading, AtLeast(7)),
                    (GrammarUse, AtLeast(15)),
                    (Vocabulary, AtLeast(7)),
                    (Advanced, AtLeast(5)),
                ]),
                rule(40, [
                    (Reading, AtLeast(8)),
                    (GrammarUse, AtLeast(18)),
                    (Vocabulary, AtLeast(9)),
                    (Advanced, AtLeast(7)),
                ]),
            ],
            streak_threshold: 6,
        }
    }

    /// Counts correct flags inside each configured range.
    /// Positions past the end of `flags` count as wrong.
    pub fn range_counts(&self, flags: &[bool]) -> RangeCounts {
        self.ranges
            .iter()
            .map(|range| {
                let start = range.start_index.saturating_sub(1);
                let count = flags
                    .iter()
                    .skip(start)
                    .take(range.end_index.saturating_sub(start))
                    .filter(|&&correct| correct)
                    .count();
                (range.name, count as u32)
            })
            .collect()
    }

    /// Level from the fixed buckets. Totals above the last bucket keep its level.
    pub fn base_level(&self, total_correct: u32) -> CefrLevel {
        self.buckets
            .iter()
            .find(|b| b.contains(total_correct))
            .or_else(|| {
                self.buckets
                    .iter()
                    .filter(|b| b.min <= total_correct)
                    .max_by_key(|b| b.max)
            })
            .map(|b| b.level)
            .unwrap_or(CefrLevel::A1)
    }

    fn tie_break_rule(&self, total_correct: u32) -> Option<&TieBreakRule> {
        self.tie_breaks.iter().find(|r| r.boundary == total_correct)
    }
}

impl Default for PlacementLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlacementInput<'a> {
    pub total_correct: u32,
    pub range_counts: &'a RangeCounts,
    pub longest_wrong_streak: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDecision {
    pub recommended_level: CefrLevel,
    pub base_level: CefrLevel,
    /// The total sat exactly on a boundary, whether or not it promoted.
    pub tie_break_applied: bool,
    pub promoted: bool,
    pub has_long_wrong_streak: bool,
    pub rubric_applied: bool,
}

/// Level from an explicit rubric, if one of its bands holds `total_correct`.
pub fn rubric_level(rubric: &[LevelBand], total_correct: u32) -> Option<CefrLevel> {
    rubric
        .iter()
        .find(|b| b.contains(total_correct))
        .map(|b| b.level)
}

/// Recommends a level:
///
/// 1. base bucket for the total
/// 2. one-step promotion on a boundary when enough range signals hold
/// 3. one-step demotion (floored at A1) on a long wrong streak
/// 4. a matching rubric band replaces all of the above
pub fn decide(
    layout: &PlacementLayout,
    input: PlacementInput<'_>,
    rubric: Option<&[LevelBand]>,
) -> PlacementDecision {
    let base_level = layout.base_level(input.total_correct);
    let mut level = base_level;

    let rule = layout.tie_break_rule(input.total_correct);
    let promoted = rule.is_some_and(|r| r.signals_met(input.range_counts) >= r.min_signals);
    if promoted {
        level = level.promote();
    }

    let has_long_wrong_streak = input.longest_wrong_streak >= layout.streak_threshold;
    if has_long_wrong_streak {
        level = level.demote();
    }

    let rubric_override = rubric.and_then(|bands| rubric_level(bands, input.total_correct));

    PlacementDecision {
        recommended_level: rubric_override.unwrap_or(level),
        base_level,
        tie_break_applied: rule.is_some(),
        promoted,
        has_long_wrong_streak,
        rubric_applied: rubric_override.is_some(),
    }
}
