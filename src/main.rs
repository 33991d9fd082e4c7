//! GlucoTrack API Server

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glucotrack::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging (JSON lines in production)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "glucotrack=debug,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("GlucoTrack API starting ({})...", config.environment);

    let port = config.port;
    let state = AppState::new(config);

    let paths = state.store.paths();
    tracing::info!("Model artifact: {}", paths.model.display());
    tracing::info!("Scaler artifact: {}", paths.scaler.display());
    tracing::info!("Recovery policy: {:?}", state.store.policy());

    // Not fatal: the service starts unready and recovers on reload
    if !state.store.ensure_loaded() {
        tracing::warn!("Artifacts not loaded at startup - serving as not ready");
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
