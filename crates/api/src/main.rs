mod config;
mod error;
mod routes;
mod state;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cfg = AppConfig::from_env();
    if cfg.provider.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; definition lookups will fail");
    }

    let store = store::Store::connect(&cfg.mongo_uri)
        .await
        .context("Failed to connect to MongoDB")?;

    let state = AppState {
        generator: generate::Generator::new(generate::GeminiClient::new(cfg.provider.clone())),
        store,
        tokens: auth::TokenService::new(&cfg.secret_key),
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .context("Failed to bind listener")?;

    info!(port = cfg.port, "server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
