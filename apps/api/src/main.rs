mod config;
mod errors;
mod llm_client;
mod review;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::readiness::ReadinessGate;
use crate::llm_client::{ChatCapability, HttpChatClient};
use crate::review::analyzer::{PromptTemplate, ResumeAnalyzer};
use crate::review::extractor::{PdfExtractBackend, TextExtractor};
use crate::review::session::ReviewOrchestrator;
use crate::review::settings::ReviewSettings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Review API v{}", env!("CARGO_PKG_VERSION"));

    let settings = match &config.review_config_path {
        Some(path) => ReviewSettings::from_file(path)?,
        None => ReviewSettings::default(),
    };
    info!(
        "Review settings: {} checklist items, {} metrics",
        settings.checks.len(),
        settings.metrics.len()
    );

    let template = match &config.prompt_template_path {
        Some(path) => PromptTemplate::from_file(path)?,
        None => PromptTemplate::default(),
    };

    // Initialize chat client and readiness gate
    let gate = ReadinessGate::new();
    {
        let gate = gate.clone();
        tokio::spawn(async move {
            gate.wait_ready().await;
            info!("AI service ready (model: {}); uploads enabled", llm_client::MODEL);
        });
    }

    let chat: Arc<dyn ChatCapability> = Arc::new(HttpChatClient::new(
        config.chat_api_url.clone(),
        config.chat_api_key.clone().unwrap_or_default(),
        Duration::from_secs(config.chat_timeout_secs),
    )?);
    if config.chat_api_key.is_some() {
        gate.signal_ready();
    } else {
        warn!("CHAT_API_KEY is not set; uploads stay disabled");
    }

    let review = ReviewOrchestrator::new(
        TextExtractor::new(Arc::new(PdfExtractBackend)),
        ResumeAnalyzer::new(chat, template),
        Arc::new(settings),
        gate,
    );

    let state = AppState {
        review,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
