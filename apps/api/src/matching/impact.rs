//! Impact signal: rewards resumes that state concrete achievements.
//!
//! Two strategies, picked by configuration:
//! - `Lexical`: distinct action verbs found in the resume, 5 points each, capped at 15.
//! - `Quantitative`: numeric-impact tokens ("30%", "2x", "50") in the resume relative to
//!   the job description: min(resume, jd) / max(jd, 1) × 100. Matching the JD's density
//!   earns full marks; exceeding it earns nothing extra.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const ACTION_VERBS: &[&str] = &[
    "built",
    "developed",
    "designed",
    "implemented",
    "deployed",
    "optimized",
    "led",
    "managed",
    "improved",
    "created",
    "engineered",
    "launched",
    "integrated",
    "architected",
    "reduced",
    "increased",
    "automated",
    "analyzed",
];

pub const VERB_WEIGHT: f64 = 5.0;
pub const VERB_SCORE_CAP: f64 = 15.0;

static IMPACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+%?|\b\d+x\b").expect("impact pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactStrategy {
    /// Action-verb presence in the resume. Score range 0–15.
    Lexical,
    /// Numeric-impact density relative to the job description. Score range 0–100.
    #[default]
    Quantitative,
}

/// Scores the (lowercased) texts with the chosen strategy.
pub fn impact_score(strategy: ImpactStrategy, resume: &str, job_description: &str) -> f64 {
    match strategy {
        ImpactStrategy::Lexical => lexical_score(resume),
        ImpactStrategy::Quantitative => quantitative_score(resume, job_description),
    }
}

/// Counts distinct action verbs appearing anywhere in the resume (substring test).
pub fn count_action_verbs(resume: &str) -> usize {
    ACTION_VERBS.iter().filter(|verb| resume.contains(*verb)).count()
}

fn lexical_score(resume: &str) -> f64 {
    (count_action_verbs(resume) as f64 * VERB_WEIGHT).min(VERB_SCORE_CAP)
}

/// Number of numeric-impact tokens in the text.
pub fn count_impact_tokens(text: &str) -> usize {
    IMPACT_PATTERN.find_iter(text).count()
}

fn quantitative_score(resume: &str, job_description: &str) -> f64 {
    let resume_hits = count_impact_tokens(resume);
    let jd_hits = count_impact_tokens(job_description);
    resume_hits.min(jd_hits) as f64 / jd_hits.max(1) as f64 * 100.0
}
