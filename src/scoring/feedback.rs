// src/scoring/feedback.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub overall: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Builds feedback text from the final percentage. Three bands: 90+, 70-89, below 70.
pub fn generate_feedback(score: u32, passing_score: u32) -> Feedback {
    let verdict = if score >= passing_score {
        format!("which meets the passing score of {}%", passing_score)
    } else {
        format!("which is below the passing score of {}%", passing_score)
    };

    let mut feedback = Feedback {
        overall: format!("You scored {}%, {}.", score, verdict),
        strengths: Vec::new(),
        areas_for_improvement: Vec::new(),
        recommendations: Vec::new(),
    };

    if score >= 90 {
        feedback
            .strengths
            .push("Excellent command of the material across the test.".to_string());
        feedback
            .recommendations
            .push("You are ready to advance to the next level.".to_string());
    } else if score >= 70 {
        feedback
            .strengths
            .push("Good overall understanding of the material.".to_string());
        feedback.recommendations.extend([
            "Review the questions you missed and the rules behind them.".to_string(),
            "Keep practising regularly to consolidate this level.".to_string(),
        ]);
    } else {
        feedback
            .areas_for_improvement
            .push("Core concepts at this level need more work.".to_string());
        feedback.recommendations.extend([
            "Revisit the lesson materials for this level before retaking the test.".to_string(),
            "Work through the practice exercises focusing on your weakest skills.".to_string(),
        ]);
    }

    feedback
}
