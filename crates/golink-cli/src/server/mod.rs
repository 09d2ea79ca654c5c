//! HTTP front end
//!
//! A thin axum layer over the registry. Routes:
//!
//! - `GET /` - all links, most visited first
//! - `POST /` - create or update from a `name`/`url` form
//! - `GET /{name}` - count a visit and redirect
//! - `DELETE /{name}` - delete a link
//! - `GET /search/suggest/{prefix}` - OpenSearch suggestions
//! - `GET /opensearch.xml` - OpenSearch description
//! - `GET /health` - liveness
//!
//! Static routes win over `/{name}`, so links called `health` or
//! `opensearch.xml` exist but can't be visited over HTTP.

mod error;
mod handlers;
mod state;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use golink_core::{Config, JsonLinkStore};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use handlers::{
    delete_handler, goto_handler, health_handler, list_handler, opensearch_handler,
    save_handler, suggest_all_handler, suggest_handler,
};
pub use state::AppState;

/// Build the router over `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_handler).post(save_handler))
        .route("/health", get(health_handler))
        .route("/opensearch.xml", get(opensearch_handler))
        .route("/search/suggest", get(suggest_all_handler))
        .route("/search/suggest/{prefix}", get(suggest_handler))
        .route("/{name}", get(goto_handler).delete(delete_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve links from the configured data directory until ctrl-c
pub async fn serve(config: &Config) -> Result<()> {
    let store = JsonLinkStore::from_config(config);
    info!("Serving links from {:?}", store.path());

    let state = AppState::new(Box::new(store), config.listen_addr());
    let app = router(state);

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;
    info!(
        "Server listening on http://{}/ (pid: {})",
        listener.local_addr()?,
        std::process::id()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
