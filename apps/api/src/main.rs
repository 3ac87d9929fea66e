mod config;
mod errors;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::matching::embedding::LocalEmbeddingEncoder;
use crate::matching::semantic::{TermFrequencyEncoder, TextEncoder};
use crate::matching::{MatchScorer, SemanticMethod};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the encoder once; a failed model load aborts startup
    let encoder = build_encoder(&config).await?;

    let scoring = &config.scoring;
    info!(
        "Scoring profile {:?}: encoder={}, impact={:?}, weights={:.2}/{:.2}/{:.2}, keywords<={}, match={:?}",
        scoring.profile,
        encoder.name(),
        scoring.impact_strategy,
        scoring.weights.semantic,
        scoring.weights.overlap,
        scoring.weights.impact,
        scoring.keyword_limit,
        scoring.match_policy,
    );

    let scorer = Arc::new(MatchScorer::new(config.scoring.clone(), encoder));

    // Build app state
    let state = AppState {
        config: config.clone(),
        scorer,
    };

    // Build router (CORS allow-list is applied inside)
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the semantic encoder for the configured method.
async fn build_encoder(config: &Config) -> Result<Arc<dyn TextEncoder>> {
    match config.scoring.semantic_method {
        SemanticMethod::TermFrequency => Ok(Arc::new(TermFrequencyEncoder)),
        SemanticMethod::Embedding => {
            let settings = config.embedding.clone();
            info!("Loading embedding model '{}'", settings.model);

            // Model download and ONNX session setup block, so keep them off the runtime.
            let encoder = tokio::task::spawn_blocking(move || LocalEmbeddingEncoder::load(&settings))
                .await
                .context("Embedding model loader panicked")?
                .context("Embedding model failed to load")?;
            info!("Embedding encoder '{}' loaded", encoder.model_name());

            Ok(Arc::new(encoder))
        }
    }
}
