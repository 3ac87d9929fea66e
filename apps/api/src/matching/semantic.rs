//! Semantic similarity: encode both texts into one vector space, then compare with cosine.
//!
//! Encoders are pluggable behind `TextEncoder`:
//! - `TermFrequencyEncoder`: TF-IDF space fit jointly over the two texts (no model needed).
//! - `LocalEmbeddingEncoder` (see `embedding`): in-process pretrained sentence embeddings.
//!
//! `MatchScorer` holds an `Arc<dyn TextEncoder>` chosen once at startup.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::matching::tokenizer::content_tokens;

/// Encodes a pair of texts into equal-length vectors.
///
/// The pair is passed together so statistical encoders can fit one shared vocabulary.
/// Encoding cannot fail once the encoder is built: an encoder that cannot produce
/// vectors returns empty ones, which score a similarity of 0.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    async fn encode_pair(&self, a: &str, b: &str) -> (Vec<f64>, Vec<f64>);

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Cosine similarity in [-1, 1]. Returns 0.0 for empty, mismatched, or zero-norm vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        dot = x.mul_add(y, dot);
        norm_a = x.mul_add(x, norm_a);
        norm_b = y.mul_add(y, norm_b);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

/// Encodes the pair and returns cosine similarity scaled to a percentage. Not clamped.
pub async fn semantic_percentage(
    encoder: &dyn TextEncoder,
    resume: &str,
    job_description: &str,
) -> f64 {
    let (resume_vec, job_vec) = encoder.encode_pair(resume, job_description).await;
    cosine_similarity(&resume_vec, &job_vec) * 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// TermFrequencyEncoder
// ────────────────────────────────────────────────────────────────────────────

/// TF-IDF vectors over a vocabulary fit on exactly the two input texts.
///
/// tf = raw count, idf = ln((1 + n) / (1 + df)) + 1 with n = 2, rows L2-normalized.
/// Stopwords are excluded. A text with no content tokens encodes to all zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyEncoder;

impl TermFrequencyEncoder {
    pub fn encode(&self, a: &str, b: &str) -> (Vec<f64>, Vec<f64>) {
        let counts_a = term_counts(a);
        let counts_b = term_counts(b);

        // BTreeMap keeps column order stable across calls.
        let mut vocabulary: BTreeMap<&str, u32> = BTreeMap::new();
        for term in counts_a.keys().chain(counts_b.keys()) {
            *vocabulary.entry(*term).or_insert(0) += 1;
        }

        let n_docs = 2.0_f64;
        let idf: Vec<(&str, f64)> = vocabulary
            .iter()
            .map(|(&term, &df)| (term, ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        (weigh(&counts_a, &idf), weigh(&counts_b, &idf))
    }
}

#[async_trait]
impl TextEncoder for TermFrequencyEncoder {
    async fn encode_pair(&self, a: &str, b: &str) -> (Vec<f64>, Vec<f64>) {
        self.encode(a, b)
    }

    fn name(&self) -> &'static str {
        "term_frequency"
    }
}

fn term_counts(text: &str) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for token in content_tokens(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn weigh(counts: &HashMap<&str, u32>, idf: &[(&str, f64)]) -> Vec<f64> {
    let mut row: Vec<f64> = idf
        .iter()
        .map(|(term, weight)| counts.get(term).copied().unwrap_or(0) as f64 * weight)
        .collect();
    l2_normalize(&mut row);
    row
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in row.iter_mut() {
            *x /= norm;
        }
    }
}
