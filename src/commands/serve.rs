use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::server_config::ServerConfig;
use crate::state::AppState;

pub async fn run(config: &ServerConfig, bind: Option<SocketAddr>) -> Result<()> {
    let state = AppState::from_config(config)?;

    let app = Router::new()
        .merge(routes::sync::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = match bind {
        Some(addr) => addr,
        None => config.bind_addr()?,
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "calmirror listening");

    axum::serve(listener, app).await?;

    Ok(())
}
