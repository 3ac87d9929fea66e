//! In-process sentence embeddings backed by fastembed (ONNX runtime).
//!
//! The model is loaded once at startup with `LocalEmbeddingEncoder::load`, which may
//! download weights into the cache directory on first run. A failed load aborts process
//! start. After that the model is read-only and shared across requests behind `Arc`;
//! inference runs on the blocking pool so it never stalls the async workers.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::matching::semantic::TextEncoder;

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Unknown embedding model '{0}' (expected all-MiniLM-L6-v2, all-MiniLM-L12-v2 or bge-small-en-v1.5)")]
    UnknownModel(String),

    #[error("Failed to load embedding model: {0}")]
    Load(String),

    #[error("Embedding inference failed: {0}")]
    Inference(String),

    #[error("Expected {expected} embeddings, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding model returned an empty vector")]
    EmptyVector,
}

/// Which pretrained model to load and where to keep its weights.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub model: String,
    /// Falls back to fastembed's default cache when unset.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            cache_dir: None,
        }
    }
}

/// Maps a sentence-transformers style model name to the fastembed model.
pub fn resolve_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    let normalized = name
        .trim()
        .trim_start_matches("sentence-transformers/")
        .trim_start_matches("BAAI/")
        .to_ascii_lowercase();

    match normalized.as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        _ => Err(EmbeddingError::UnknownModel(name.to_string())),
    }
}

#[derive(Clone)]
pub struct LocalEmbeddingEncoder {
    model: Arc<TextEmbedding>,
    model_name: String,
}

impl LocalEmbeddingEncoder {
    /// Loads the model and embeds a fixed pair so a broken install fails here rather than
    /// on the first request. Blocking: call from `spawn_blocking`.
    pub fn load(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        let model = resolve_model(&settings.model)?;

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = &settings.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }

        let embedding =
            TextEmbedding::try_new(options).map_err(|e| EmbeddingError::Load(e.to_string()))?;

        let encoder = Self {
            model: Arc::new(embedding),
            model_name: settings.model.clone(),
        };

        let warm_up = vec!["resume".to_string(), "job description".to_string()];
        let (probe, _) = embed_texts(&encoder.model, warm_up)?;
        info!(
            "Embedding model '{}' ready ({} dimensions)",
            encoder.model_name,
            probe.len()
        );

        Ok(encoder)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl TextEncoder for LocalEmbeddingEncoder {
    async fn encode_pair(&self, a: &str, b: &str) -> (Vec<f64>, Vec<f64>) {
        let model = Arc::clone(&self.model);
        let texts = vec![a.to_string(), b.to_string()];

        let outcome = tokio::task::spawn_blocking(move || embed_texts(&model, texts))
            .await
            .map_err(|e| EmbeddingError::Inference(e.to_string()))
            .and_then(|inner| inner);

        pair_or_empty(outcome)
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

fn embed_texts(
    model: &TextEmbedding,
    texts: Vec<String>,
) -> Result<(Vec<f64>, Vec<f64>), EmbeddingError> {
    let rows = model
        .embed(texts, None)
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;
    let pair = into_pair(rows)?;
    debug!("Embedded pair: dim={}", pair.0.len());
    Ok(pair)
}

/// Widens the two rows to f64 and checks they form a usable pair.
fn into_pair(rows: Vec<Vec<f32>>) -> Result<(Vec<f64>, Vec<f64>), EmbeddingError> {
    if rows.len() != 2 {
        return Err(EmbeddingError::WrongCount {
            expected: 2,
            got: rows.len(),
        });
    }

    let mut widened = rows
        .into_iter()
        .map(|row| row.into_iter().map(f64::from).collect::<Vec<f64>>());
    let first = widened.next().unwrap_or_default();
    let second = widened.next().unwrap_or_default();

    if first.is_empty() || second.is_empty() {
        return Err(EmbeddingError::EmptyVector);
    }
    if first.len() != second.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: first.len(),
            right: second.len(),
        });
    }

    Ok((first, second))
}

/// A failed inference degrades to empty vectors, which cosine similarity scores as 0.
fn pair_or_empty(outcome: Result<(Vec<f64>, Vec<f64>), EmbeddingError>) -> (Vec<f64>, Vec<f64>) {
    match outcome {
        Ok(pair) => pair,
        Err(e) => {
            error!("Embedding failed, semantic score falls back to 0: {e}");
            (Vec::new(), Vec::new())
        }
    }
}
