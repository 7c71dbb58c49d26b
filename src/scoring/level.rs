// src/scoring/level.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// CEFR proficiency level. Variants are declared lowest first so the derived
/// ordering matches the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// One step up the scale, saturating at C2.
    pub fn promote(self) -> Self {
        match self {
            CefrLevel::A1 => CefrLevel::A2,
            CefrLevel::A2 => CefrLevel::B1,
            CefrLevel::B1 => CefrLevel::B2,
            CefrLevel::B2 => CefrLevel::C1,
            CefrLevel::C1 | CefrLevel::C2 => CefrLevel::C2,
        }
    }

    /// One step down the scale, floored at A1.
    pub fn demote(self) -> Self {
        match self {
            CefrLevel::A1 | CefrLevel::A2 => CefrLevel::A1,
            CefrLevel::B1 => CefrLevel::A2,
            CefrLevel::B2 => CefrLevel::B1,
            CefrLevel::C1 => CefrLevel::B2,
            CefrLevel::C2 => CefrLevel::C1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CefrLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScoringError::UnknownLevel(s.to_string()))
    }
}
