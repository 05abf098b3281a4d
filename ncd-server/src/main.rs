//! Binary entry point for the NCD chatbot HTTP API.

use anyhow::Context;
use ncd_rag::{AppSettings, RagConfig};
use ncd_server::{init_state, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let settings = AppSettings::from_env()?;
    let config = RagConfig::default();

    let state = init_state(&settings, &config).await;
    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "NCD chatbot API listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
