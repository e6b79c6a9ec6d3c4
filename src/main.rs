//! Hirevox Engine - service entry point.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hirevox_engine::http::{router, AppState};
use hirevox_engine::EngineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env();
    info!(
        engine = %config.backend.engine,
        model = %config.backend.model,
        base_url = %config.backend.base_url,
        drill_threshold = config.drill_threshold,
        "starting dialog engine"
    );

    let state = AppState::from_config(config.clone());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
