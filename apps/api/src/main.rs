mod config;
mod errors;
mod llm_client;
mod requirements;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppMode, Config};
use crate::llm_client::LlmClient;
use crate::requirements::demo::DemoProcessor;
use crate::requirements::processor::{LiveProcessor, RequirementProcessor};
use crate::requirements::templates::TemplateStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={level},tower_http={level}",
                env!("CARGO_PKG_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Reqsmith v{} in {} mode",
        env!("CARGO_PKG_VERSION"),
        config.mode
    );

    let processor = build_processor(&config)?;

    let state = AppState { processor };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires the processor for the configured mode. Live mode loads and validates
/// the template store up front so a bad template file stops startup.
fn build_processor(config: &Config) -> Result<Arc<dyn RequirementProcessor>> {
    match config.mode {
        AppMode::Demo => {
            info!("Demo processor ready (delay unit: {}ms)", config.demo_delay_ms);
            Ok(Arc::new(DemoProcessor::new(Duration::from_millis(
                config.demo_delay_ms,
            ))))
        }
        AppMode::Live => {
            let templates = match &config.templates_path {
                Some(path) => TemplateStore::from_path(path)
                    .with_context(|| format!("Failed to load templates from {}", path.display()))?,
                None => TemplateStore::builtin().context("Built-in templates failed to load")?,
            };
            info!(
                "Templates loaded from {}",
                config
                    .templates_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in set".to_string())
            );

            let api_key = config
                .openai_api_key
                .clone()
                .context("OPENAI_API_KEY is required in live mode")?;
            let llm = LlmClient::new(api_key, &config.openai_base_url, config.openai_model.clone());
            info!("LLM client initialized (model: {})", llm.model());

            Ok(Arc::new(LiveProcessor::new(
                Arc::new(llm),
                Arc::new(templates),
            )))
        }
    }
}
