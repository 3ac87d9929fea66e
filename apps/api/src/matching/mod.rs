//! Resume ↔ job-description matching pipeline.
//!
//! normalize → semantic similarity → keyword overlap → impact signal → weighted aggregate.
//!
//! `MatchScorer` is built once at startup from a `ScoringConfig` and an injected
//! `TextEncoder`, then shared read-only across requests via `AppState`.

pub mod aggregate;
pub mod embedding;
pub mod handlers;
pub mod impact;
pub mod keywords;
pub mod models;
pub mod normalize;
pub mod semantic;
pub mod tokenizer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::matching::aggregate::{
    assemble, SubScores, Weights, EMBEDDING_WEIGHTS, TERM_FREQUENCY_WEIGHTS,
};
use crate::matching::impact::{impact_score, ImpactStrategy};
use crate::matching::keywords::{
    extract_keywords, KeywordSet, MatchPolicy, DEFAULT_KEYWORD_LIMIT,
};
use crate::matching::models::ScoreResult;
use crate::matching::normalize::normalize;
use crate::matching::semantic::{semantic_percentage, TextEncoder};

/// Errors surfaced by `MatchScorer::score`. Only validation can fail.
///
/// Degenerate inputs (zero-norm vectors, no extractable keywords) are not errors:
/// they score 0 and the caller still gets a full `ScoreResult`.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Inputs cannot be empty")]
    EmptyInput { field: &'static str },
}

/// How the two texts are placed in a vector space for cosine similarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticMethod {
    /// Pretrained sentence-embedding model behind `LocalEmbeddingEncoder`.
    Embedding,
    /// TF-IDF space fit over the two texts. No model required.
    #[default]
    TermFrequency,
}

/// Named bundle of semantic method, impact strategy and weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    /// Embedding similarity, lexical impact, weights 0.6 / 0.3 / 0.1.
    Embedding,
    /// TF-IDF similarity, quantitative impact, weights 0.5 / 0.3 / 0.2.
    #[default]
    TermFrequency,
}

/// Full pipeline configuration. Read-only after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub profile: ScoringProfile,
    pub semantic_method: SemanticMethod,
    pub impact_strategy: ImpactStrategy,
    pub weights: Weights,
    pub keyword_limit: usize,
    pub match_policy: MatchPolicy,
    pub include_matched_skills: bool,
}

impl ScoringConfig {
    pub fn from_profile(profile: ScoringProfile) -> Self {
        let (semantic_method, impact_strategy, weights) = match profile {
            ScoringProfile::Embedding => (
                SemanticMethod::Embedding,
                ImpactStrategy::Lexical,
                EMBEDDING_WEIGHTS,
            ),
            ScoringProfile::TermFrequency => (
                SemanticMethod::TermFrequency,
                ImpactStrategy::Quantitative,
                TERM_FREQUENCY_WEIGHTS,
            ),
        };

        Self {
            profile,
            semantic_method,
            impact_strategy,
            weights,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            match_policy: MatchPolicy::Substring,
            include_matched_skills: true,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::from_profile(ScoringProfile::default())
    }
}

/// The scoring pipeline. Stateless per call; safe to share behind `Arc`.
#[derive(Clone)]
pub struct MatchScorer {
    config: ScoringConfig,
    encoder: Arc<dyn TextEncoder>,
}

impl MatchScorer {
    pub fn new(config: ScoringConfig, encoder: Arc<dyn TextEncoder>) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn encoder_name(&self) -> &'static str {
        self.encoder.name()
    }

    /// Scores a resume against a job description.
    ///
    /// Fails only on empty/whitespace input; every other input yields finite, rounded scores.
    pub async fn score(&self, resume: &str, job_description: &str) -> Result<ScoreResult, ScoreError> {
        let pair = normalize(resume, job_description)?;

        let semantic =
            semantic_percentage(self.encoder.as_ref(), &pair.resume, &pair.job_description).await;

        let candidates = extract_keywords(&pair.job_description, self.config.keyword_limit);
        let keywords = KeywordSet::partition(candidates, &pair.resume, self.config.match_policy);
        let overlap = keywords.overlap_percentage();

        let impact = impact_score(
            self.config.impact_strategy,
            &pair.resume,
            &pair.job_description,
        );

        debug!(
            encoder = self.encoder.name(),
            semantic,
            overlap,
            impact,
            matched = keywords.matched.len(),
            missing = keywords.missing.len(),
            "scored resume against job description"
        );

        Ok(assemble(
            &self.config.weights,
            SubScores {
                semantic,
                overlap,
                impact,
            },
            keywords,
            self.config.include_matched_skills,
        ))
    }
}
