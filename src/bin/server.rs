//! maritime-query HTTP server binary.
//!
//! Starts an axum HTTP server answering vessel questions over a SQLite
//! record store.
//!
//! # Environment Variables
//!
//! - `PORT` / `MARITIME_BIND` — listen address (default: 0.0.0.0:8080)
//! - `MARITIME_DB` — SQLite database path (default: maritime_data.db)
//! - `MARITIME_CONFIG` — optional YAML config file
//! - `RUST_LOG` — Tracing filter (default: "info,maritime_query=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::sync::Arc;

use anyhow::Context;
use maritime_query::server::{app_router, AppState};
use maritime_query::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,maritime_query=debug".into()),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let router = config.router()?;
    let store = config.store();

    if !store.db_path.exists() {
        tracing::warn!(
            "database {} does not exist yet; load data with `maritime load <csv>`",
            store.db_path.display()
        );
    }

    let state = AppState::new(Arc::new(store), router);
    let app = app_router(state);

    tracing::info!("maritime-query server starting on {}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health   — liveness probe");
    tracing::info!("  POST /process  — answer a vessel question");
    tracing::info!("  GET  /download — CSV export of a reply");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
