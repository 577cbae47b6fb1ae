use afina::engine::RemoteEngine;
use afina::http::{create_router, AppState};
use afina::Config;
use anyhow::{Context, Result};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    log::info!("Starting Afina v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Engine endpoint: {}", config.engine.base_url);
    log::info!("Upload folder: {}", config.storage.ref_folder.display());

    // Uploaded sources live here verbatim, keyed by original filename
    std::fs::create_dir_all(&config.storage.ref_folder).with_context(|| {
        format!(
            "Failed to create upload folder {}",
            config.storage.ref_folder.display()
        )
    })?;

    let engine = Arc::new(RemoteEngine::new(
        &config.engine.base_url,
        config.engine.timeout_secs,
    )?);
    let state = AppState::new(engine, config.storage.ref_folder.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    log::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
