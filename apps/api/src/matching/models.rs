use serde::{Deserialize, Serialize};

/// Request body for `POST /api/match`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub resume: String,
    pub job_description: String,
}

/// Coarse reading of the final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,   // >= 75
    Moderate, // 50 – 74.99
    Weak,     // < 50
}

impl MatchBand {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 75.0 {
            MatchBand::Strong
        } else if pct >= 50.0 {
            MatchBand::Moderate
        } else {
            MatchBand::Weak
        }
    }
}

/// Scoring output. All floats are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub final_match_percentage: f64,
    pub semantic_score: f64,
    pub skill_overlap_score: f64,
    pub impact_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_skills: Option<Vec<String>>,
    pub missing_keywords: Vec<String>,
    pub match_band: MatchBand,
    pub recommendation: String,
}
