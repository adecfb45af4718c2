//! HTTP surface: one authenticated download endpoint and a health probe.
//!
//! - `GET /report/pdf`: the caller's compiled report (identity header required)
//! - `GET /health`: liveness

mod auth;
mod config;
mod error;
mod handler;
mod state;

pub use auth::{AuthenticatedUser, identity_middleware};
pub use config::ServerConfig;
pub use error::ApiError;
pub use handler::{download_report, health_check};
pub use state::AppState;

use crate::error::PipelineError;
use crate::renderer::SectionRenderer;
use axum::{Router, middleware, routing::get};
use log::info;

pub fn router<R: SectionRenderer + 'static>(state: AppState<R>) -> Router {
    let report_routes = Router::new()
        .route("/report/pdf", get(download_report::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware::<R>,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(report_routes)
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve<R: SectionRenderer + 'static>(
    addr: &str,
    state: AppState<R>,
) -> Result<(), PipelineError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[SERVER] Listening on {}", listener.local_addr()?);
    info!("[SERVER]   GET /report/pdf");
    info!("[SERVER]   GET /health");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
