mod api;
mod config;
mod pages;
mod views;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Internal imports
use crate::config::Settings;
use dashboard_core::{Registry, ToolRunner, WebhookClient};

// Room for a 5MB image after base64 inflation, plus the other fields
const BODY_LIMIT: usize = 16 * 1024 * 1024;

// 1. Application State
// The registry inside the runner is loaded once and never mutated.
#[derive(Clone)]
pub(crate) struct AppState {
    runner: Arc<ToolRunner>,
    tools_config: Arc<str>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 2. Logging Setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    info!("Dashboard Gateway Initializing...");
    let settings = Settings::from_env()?;

    // 3. Load The Registry (The Menu)
    info!("Loading Tool Registry from {}...", settings.tools_config.display());
    let registry = Registry::load(&settings.tools_config)
        .await
        .context("Failed to load tool registry")?;
    info!("Loaded {} tools.", registry.len());

    // 4. Bundle State
    let webhook = WebhookClient::new(settings.webhook_timeout);
    info!("Webhook timeout: {}ms", webhook.timeout().as_millis());
    let state = AppState {
        runner: Arc::new(ToolRunner::new(Arc::new(registry), webhook)),
        tools_config: settings.tools_config.display().to_string().into(),
    };

    // 5. Start Server
    let listener = TcpListener::bind(settings.addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.addr))?;
    info!("Gateway listening on {}...", settings.addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/tools", get(api::list_tools))
        .route("/tools/{id}", get(api::get_tool))
        .route("/tools/{id}/run", post(api::run_tool))
        .layer(cors);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(pages::dashboard))
        .route("/tools/{id}", get(pages::tool_page).post(pages::submit_form))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- HANDLERS ---

async fn health_check() -> &'static str {
    "Dashboard Gateway: Operational"
}
