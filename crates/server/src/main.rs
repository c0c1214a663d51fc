use std::sync::Arc;

use anyhow::Context;
use server::{
    build_router,
    config::{load_settings, parse_bind_addr},
    AppState,
};
use server_api::ApiContext;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let api = if settings.seed_catalog {
        ApiContext::seeded()
    } else {
        ApiContext::empty()
    };
    let app = build_router(Arc::new(AppState { api }), settings.body_limit_bytes);

    let addr = parse_bind_addr(&settings.server_bind)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, seed_catalog = settings.seed_catalog, "catalog server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("catalog server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
