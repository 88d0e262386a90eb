mod config;
mod errors;
mod extract;
mod llm_client;
mod rate_limit;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extract::{ocr::TesseractCli, TextExtractor};
use crate::llm_client::LlmClient;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.aiml_api_key.clone(),
        &config.aiml_base_url,
        config.llm_model.clone(),
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm.model(),
        llm.endpoint()
    );

    // Initialize text extraction (OCR engine runs once per image)
    let ocr = TesseractCli::new(config.tesseract_cmd.clone(), config.ocr_timeout);
    let extractor = TextExtractor::new(Arc::new(ocr));
    info!("OCR engine: {} (timeout {:?})", config.tesseract_cmd, config.ocr_timeout);

    // Initialize rate limiter for /api/parse
    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window,
        config.trust_proxy,
    ));
    rate_limit::spawn_pruner(rate_limiter.clone());
    info!(
        "Rate limit: {} requests per {:?} per client",
        config.rate_limit_max, config.rate_limit_window
    );

    // Build app state
    let state = AppState {
        extractor,
        completer: Arc::new(llm),
        rate_limiter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
