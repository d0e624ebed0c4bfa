//! Axum router configuration for klippekort endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{consume_klippekort, list_klippekort, list_packages, purchase_klippekort};

/// Create the klippekort API router.
///
/// # Routes (all require a session)
/// - `GET /klippekort` - The caller's cards
/// - `POST /klippekort` - Buy a card
/// - `POST /klippekort/:id/consume` - Spend sessions
/// - `GET /klippekort/packages` - Active packages
pub fn klippekort_routes() -> Router<AppState> {
    Router::new()
        .route("/klippekort", get(list_klippekort).post(purchase_klippekort))
        .route("/klippekort/packages", get(list_packages))
        .route("/klippekort/:id/consume", post(consume_klippekort))
}
