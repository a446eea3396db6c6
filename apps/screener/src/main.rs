mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::classifier::{OfflineClassifier, SkillClassifier};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    // Pick the classifier backend
    let classifier: Arc<dyn SkillClassifier> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM classifier initialized (model: {})", llm_client::MODEL);
            Arc::new(llm)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, using offline classifier (deterministic fallbacks only)");
            Arc::new(OfflineClassifier)
        }
    };

    let weights = &config.fit_weights;
    info!(
        "Fit weights: match={} extra={} max_extra_skills_bonus={}, selection threshold {}%",
        weights.match_weight,
        weights.extra_weight,
        weights.max_extra_skills_bonus,
        config.selection_threshold
    );

    // Build app state
    let mut state = AppState::new(config.clone(), classifier);

    if let Some(path) = &config.requirements_file {
        let requirements = state.parser.parse_file(path).await;
        if requirements.is_empty() {
            warn!("No skills loaded from {}, screenings must supply requirements", path.display());
        } else {
            info!(
                "Default requirements loaded from {}: {} required, {} nice-to-have",
                path.display(),
                requirements.required_skills.len(),
                requirements.nice_to_have.len()
            );
            state = state.with_default_requirements(requirements);
        }
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
