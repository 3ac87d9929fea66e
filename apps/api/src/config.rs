use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use crate::matching::aggregate::Weights;
use crate::matching::embedding::{resolve_model, EmbeddingSettings, DEFAULT_EMBEDDING_MODEL};
use crate::matching::impact::ImpactStrategy;
use crate::matching::keywords::MatchPolicy;
use crate::matching::{ScoringConfig, ScoringProfile, SemanticMethod};

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://resumatch123.vercel.app",
    "http://resumatch123.vercel.app",
    "http://localhost:3000",
    "http://localhost:3001",
];

/// Application configuration loaded from environment variables.
/// Startup fails on invalid values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub allowed_origins: Vec<String>,
    pub scoring: ScoringConfig,
    /// Only loaded when `scoring.semantic_method` is `Embedding`.
    pub embedding: EmbeddingSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source. `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_list(&raw),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let profile = match get("SCORING_PROFILE") {
            Some(raw) => parse_profile(&raw)?,
            None => ScoringProfile::default(),
        };
        let mut scoring = ScoringConfig::from_profile(profile);

        if let Some(raw) = get("SEMANTIC_METHOD") {
            scoring.semantic_method = parse_semantic_method(&raw)?;
        }
        if let Some(raw) = get("IMPACT_STRATEGY") {
            scoring.impact_strategy = parse_impact_strategy(&raw)?;
        }
        if let Some(raw) = get("KEYWORD_MATCH_POLICY") {
            scoring.match_policy = parse_match_policy(&raw)?;
        }
        if let Some(raw) = get("KEYWORD_LIMIT") {
            scoring.keyword_limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("KEYWORD_LIMIT must be a positive integer, got '{raw}'"))?;
        }
        if let Some(raw) = get("SCORE_WEIGHTS") {
            scoring.weights = parse_weights(&raw).context("SCORE_WEIGHTS is invalid")?;
        }
        if let Some(raw) = get("INCLUDE_MATCHED_SKILLS") {
            scoring.include_matched_skills = parse_bool(&raw)
                .with_context(|| format!("INCLUDE_MATCHED_SKILLS must be true or false, got '{raw}'"))?;
        }

        scoring
            .weights
            .validate()
            .map_err(|e| anyhow!(e))
            .context("Scoring weights are invalid")?;

        let embedding = EmbeddingSettings {
            model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            cache_dir: get("EMBEDDING_CACHE_DIR").map(PathBuf::from),
        };
        if scoring.semantic_method == SemanticMethod::Embedding {
            resolve_model(&embedding.model).context("EMBEDDING_MODEL is invalid")?;
        }

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            allowed_origins,
            scoring,
            embedding,
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_profile(raw: &str) -> Result<ScoringProfile> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "embedding" => Ok(ScoringProfile::Embedding),
        "term_frequency" | "tfidf" => Ok(ScoringProfile::TermFrequency),
        other => bail!("SCORING_PROFILE must be 'embedding' or 'term_frequency', got '{other}'"),
    }
}

fn parse_semantic_method(raw: &str) -> Result<SemanticMethod> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "embedding" => Ok(SemanticMethod::Embedding),
        "term_frequency" | "tfidf" => Ok(SemanticMethod::TermFrequency),
        other => bail!("SEMANTIC_METHOD must be 'embedding' or 'term_frequency', got '{other}'"),
    }
}

fn parse_impact_strategy(raw: &str) -> Result<ImpactStrategy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "lexical" => Ok(ImpactStrategy::Lexical),
        "quantitative" => Ok(ImpactStrategy::Quantitative),
        other => bail!("IMPACT_STRATEGY must be 'lexical' or 'quantitative', got '{other}'"),
    }
}

fn parse_match_policy(raw: &str) -> Result<MatchPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "substring" => Ok(MatchPolicy::Substring),
        "whole_word" => Ok(MatchPolicy::WholeWord),
        other => bail!("KEYWORD_MATCH_POLICY must be 'substring' or 'whole_word', got '{other}'"),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses `semantic,overlap,impact`, e.g. `0.6,0.3,0.1`.
fn parse_weights(raw: &str) -> Result<Weights> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .with_context(|| format!("'{}' is not a number", p.trim()))
        })
        .collect::<Result<_>>()?;

    match parts.as_slice() {
        &[semantic, overlap, impact] => Ok(Weights {
            semantic,
            overlap,
            impact,
        }),
        _ => bail!("expected three comma-separated weights, got {}", parts.len()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::matching::aggregate::{EMBEDDING_WEIGHTS, TERM_FREQUENCY_WEIGHTS};

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.allowed_origins.len(), 4);
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(config.embedding, EmbeddingSettings::default());
    }

    #[test]
    fn test_embedding_profile_needs_no_endpoint() {
        let config = load(&[("SCORING_PROFILE", "embedding")]).unwrap();
        assert_eq!(config.scoring.semantic_method, SemanticMethod::Embedding);
        assert_eq!(config.scoring.weights, EMBEDDING_WEIGHTS);
        assert_eq!(config.scoring.impact_strategy, ImpactStrategy::Lexical);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert!(config.embedding.cache_dir.is_none());
    }

    #[test]
    fn test_embedding_model_and_cache_dir() {
        let config = load(&[
            ("SCORING_PROFILE", "embedding"),
            ("EMBEDDING_MODEL", "bge-small-en-v1.5"),
            ("EMBEDDING_CACHE_DIR", "/var/cache/resumatch"),
        ])
        .unwrap();
        assert_eq!(config.embedding.model, "bge-small-en-v1.5");
        assert_eq!(
            config.embedding.cache_dir,
            Some(PathBuf::from("/var/cache/resumatch"))
        );
    }

    #[test]
    fn test_unknown_embedding_model_rejected() {
        let err = load(&[
            ("SCORING_PROFILE", "embedding"),
            ("EMBEDDING_MODEL", "text-embedding-3-small"),
        ])
        .unwrap_err();
        assert!(format!("{err:#}").contains("EMBEDDING_MODEL"));
    }

    #[test]
    fn test_overrides_apply_on_top_of_profile() {
        let config = load(&[
            ("IMPACT_STRATEGY", "lexical"),
            ("KEYWORD_MATCH_POLICY", "whole_word"),
            ("KEYWORD_LIMIT", "10"),
            ("INCLUDE_MATCHED_SKILLS", "false"),
        ])
        .unwrap();
        assert_eq!(config.scoring.semantic_method, SemanticMethod::TermFrequency);
        assert_eq!(config.scoring.weights, TERM_FREQUENCY_WEIGHTS);
        assert_eq!(config.scoring.impact_strategy, ImpactStrategy::Lexical);
        assert_eq!(config.scoring.match_policy, MatchPolicy::WholeWord);
        assert_eq!(config.scoring.keyword_limit, 10);
        assert!(!config.scoring.include_matched_skills);
    }

    #[test]
    fn test_custom_weights() {
        let config = load(&[("SCORE_WEIGHTS", "0.7, 0.2, 0.1")]).unwrap();
        assert_eq!(config.scoring.weights.semantic, 0.7);
    }

    #[test]
    fn test_weights_not_summing_to_one_rejected() {
        assert!(load(&[("SCORE_WEIGHTS", "0.6,0.3,0.2")]).is_err());
    }

    #[test]
    fn test_weights_wrong_arity_rejected() {
        assert!(load(&[("SCORE_WEIGHTS", "0.5,0.5")]).is_err());
    }

    #[test]
    fn test_zero_keyword_limit_rejected() {
        assert!(load(&[("KEYWORD_LIMIT", "0")]).is_err());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        assert!(load(&[("SCORING_PROFILE", "bm25")]).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(load(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_origins_parsed_from_list() {
        let config = load(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://a.example, https://b.example,,",
        )])
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
