//! HTTP adapters - REST API over the application handlers.
//!
//! Each area has its own module for endpoint exposure:
//!
//! - `membership` - Member subscription lifecycle
//! - `klippekort` - Member punch cards
//! - `admin` - Staff endpoints
//!
//! All `/api` routes require a session (see [`CurrentUser`]). `GET /health`
//! is open.

pub mod admin;
mod error;
pub mod klippekort;
pub mod membership;
mod middleware;
mod state;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

pub use error::{status_for, ApiError, ErrorResponse};
pub use middleware::{CurrentUser, SESSION_COOKIE};
pub use state::AppState;

use admin::admin_routes;
use klippekort::klippekort_routes;
use membership::membership_routes;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the complete router. Middleware layers are added by the caller.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(membership_routes())
        .merge(klippekort_routes())
        .nest("/admin", admin_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}
