//! Aggregation: weighted sum of the sub-scores and assembly of the result record.
//!
//! final = w_semantic·semantic + w_overlap·overlap + w_impact·impact, computed from the
//! unrounded sub-scores and rounded to 2 decimals. No clamping: the final value leaves
//! [0, 100] only if a sub-score does (a negative cosine similarity can).

use serde::{Deserialize, Serialize};

use crate::matching::keywords::KeywordSet;
use crate::matching::models::{MatchBand, ScoreResult};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Sub-score weights. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub semantic: f64,
    pub overlap: f64,
    pub impact: f64,
}

/// Embedding similarity + lexical impact variant.
pub const EMBEDDING_WEIGHTS: Weights = Weights {
    semantic: 0.6,
    overlap: 0.3,
    impact: 0.1,
};

/// Term-frequency similarity + quantitative impact variant.
pub const TERM_FREQUENCY_WEIGHTS: Weights = Weights {
    semantic: 0.5,
    overlap: 0.3,
    impact: 0.2,
};

impl Weights {
    pub fn sum(&self) -> f64 {
        self.semantic + self.overlap + self.impact
    }

    /// Ok if every weight is finite and non-negative and the three sum to 1.0.
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.semantic, self.overlap, self.impact];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("weights must be finite and non-negative: {self:?}"));
        }
        if (self.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("weights must sum to 1.0, got {}", self.sum()));
        }
        Ok(())
    }

    pub fn combine(&self, semantic: f64, overlap: f64, impact: f64) -> f64 {
        self.semantic * semantic + self.overlap * overlap + self.impact * impact
    }
}

/// Rounds to 2 decimal places, exact halves to even (0.125 → 0.12, 0.375 → 0.38).
pub fn round_2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Unrounded sub-scores produced by the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub semantic: f64,
    pub overlap: f64,
    pub impact: f64,
}

/// Builds the final `ScoreResult` from sub-scores and the keyword partition.
pub fn assemble(
    weights: &Weights,
    scores: SubScores,
    keywords: KeywordSet,
    include_matched_skills: bool,
) -> ScoreResult {
    let final_score = round_2(weights.combine(scores.semantic, scores.overlap, scores.impact));
    let match_band = MatchBand::from_percentage(final_score);
    let recommendation = build_recommendation(final_score, match_band, &keywords.missing);

    ScoreResult {
        final_match_percentage: final_score,
        semantic_score: round_2(scores.semantic),
        skill_overlap_score: round_2(scores.overlap),
        impact_score: round_2(scores.impact),
        matched_skills: include_matched_skills.then_some(keywords.matched),
        missing_keywords: keywords.missing,
        match_band,
        recommendation,
    }
}

/// Human-readable summary naming up to three missing keywords.
fn build_recommendation(score: f64, band: MatchBand, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    match band {
        MatchBand::Strong if top_gaps.is_empty() => {
            "Strong match. The resume covers the key job requirements.".to_string()
        }
        MatchBand::Strong => format!(
            "Strong match ({score}%). Consider mentioning: {}.",
            top_gaps.join(", ")
        ),
        MatchBand::Moderate if top_gaps.is_empty() => format!(
            "Moderate match ({score}%). Keywords are covered; strengthen the wording and quantified results."
        ),
        MatchBand::Moderate => format!(
            "Moderate match ({score}%). Consider adding: {}.",
            top_gaps.join(", ")
        ),
        MatchBand::Weak if top_gaps.is_empty() => format!(
            "Weak match ({score}%). The resume reads differently from the job description."
        ),
        MatchBand::Weak => format!(
            "Weak match ({score}%). Significant gaps: {}.",
            top_gaps.join(", ")
        ),
    }
}
