//! Axum router configuration for membership endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    assign_default, cancel_freeze_request, cancel_membership, change_membership, get_membership,
    list_plans, request_freeze, subscribe, unfreeze,
};

/// Create the membership API router.
///
/// # Routes (all require a session)
/// - `GET /membership` - Current subscription with billing details
/// - `POST /membership` - Subscribe to a plan
/// - `POST /membership/default` - Subscribe to the default plan
/// - `POST /membership/change` - Change plan
/// - `POST /membership/cancel` - Cancel
/// - `POST /membership/freeze` - Request a freeze
/// - `POST /membership/freeze/cancel` - Withdraw the freeze request
/// - `POST /membership/unfreeze` - Unfreeze
/// - `GET /memberships` - Active plans
pub fn membership_routes() -> Router<AppState> {
    Router::new()
        .route("/membership", get(get_membership).post(subscribe))
        .route("/membership/default", post(assign_default))
        .route("/membership/change", post(change_membership))
        .route("/membership/cancel", post(cancel_membership))
        .route("/membership/freeze", post(request_freeze))
        .route("/membership/freeze/cancel", post(cancel_freeze_request))
        .route("/membership/unfreeze", post(unfreeze))
        .route("/memberships", get(list_plans))
}
