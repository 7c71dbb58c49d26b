// src/scoring/skill.rs

use serde::{Deserialize, Serialize};

/// Skill tag carried by every section of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Reading,
    Writing,
    Listening,
    Speaking,
    Grammar,
    Vocabulary,
}
