//! Keyword overlap: salient job-description terms checked against the resume.
//!
//! Candidates are the top-K non-stopword terms of the job description by raw frequency
//! (ties broken alphabetically). Matching defaults to substring containment, so "java"
//! is found inside "javascript"; `MatchPolicy::WholeWord` switches to token equality.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::matching::tokenizer::{content_tokens, tokens};

pub const DEFAULT_KEYWORD_LIMIT: usize = 20;

/// How a candidate keyword is looked up in the resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// `resume.contains(keyword)`. Can match inside longer words.
    #[default]
    Substring,
    /// Keyword must equal one of the resume's tokens.
    WholeWord,
}

/// Candidate keywords for one request, split into matched and missing.
/// Both lists keep importance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl KeywordSet {
    /// Partitions `candidates` by presence in the (lowercased) resume.
    pub fn partition(candidates: Vec<String>, resume: &str, policy: MatchPolicy) -> Self {
        let resume_tokens: HashSet<&str> = match policy {
            MatchPolicy::WholeWord => tokens(resume).collect(),
            MatchPolicy::Substring => HashSet::new(),
        };

        let (matched, missing): (Vec<String>, Vec<String>) =
            candidates.into_iter().partition(|kw| match policy {
                MatchPolicy::Substring => resume.contains(kw.as_str()),
                MatchPolicy::WholeWord => resume_tokens.contains(kw.as_str()),
            });

        Self { matched, missing }
    }

    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    /// matched / total as a percentage; 0.0 when there were no candidates.
    pub fn overlap_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.matched.len() as f64 / total as f64 * 100.0
    }
}

/// Extracts up to `limit` distinct keywords from the job description, most frequent first.
pub fn extract_keywords(job_description: &str, limit: usize) -> Vec<String> {
    let mut frequency: HashMap<&str, u32> = HashMap::new();
    for token in content_tokens(job_description) {
        *frequency.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, u32)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(term, _)| term.to_string())
        .collect()
}
