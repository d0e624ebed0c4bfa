//! Axum router configuration for staff endpoints.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    adjust_klippekort, approve_freeze, assign_membership, create_package, create_plan, get_rules,
    reject_freeze, remove_membership, update_plan, update_rules,
};

/// Create the staff API router, mounted under `/admin`.
///
/// # Routes (session required, administrator check in the application layer)
/// - `GET|PUT /rules` - Studio membership rules
/// - `POST|DELETE /users/:user_id/membership` - Subscribe or terminate a member
/// - `POST /users/:user_id/freeze/approve` - Approve a freeze request
/// - `POST /users/:user_id/freeze/reject` - Reject a freeze request
/// - `PUT /klippekort/:id` - Set a card's balance
/// - `POST /memberships` - Create a plan
/// - `PATCH /memberships/:id` - Edit price or active flag
/// - `POST /klippekort-packages` - Create a package
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/rules", get(get_rules).put(update_rules))
        .route(
            "/users/:user_id/membership",
            post(assign_membership).delete(remove_membership),
        )
        .route("/users/:user_id/freeze/approve", post(approve_freeze))
        .route("/users/:user_id/freeze/reject", post(reject_freeze))
        .route("/klippekort/:id", put(adjust_klippekort))
        .route("/memberships", post(create_plan))
        .route("/memberships/:id", patch(update_plan))
        .route("/klippekort-packages", post(create_package))
}
