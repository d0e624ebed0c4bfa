//! HTTP handlers for member-facing membership endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.
//! Every endpoint acts on the caller's own subscription.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::CurrentUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::membership::{
    AddMembershipCommand, AssignDefaultMembershipCommand, CancelMembershipCommand,
    ChangeMembershipCommand, FreezeAction, FreezeMembershipCommand, GetMembershipQuery,
};

use super::dto::{
    ChangeMembershipResponse, MembershipResponse, PlanListResponse, PlanSelectionRequest,
    SubscriptionResponse, TransitionResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/membership - Current subscription with billing details
pub async fn get_membership(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let membership = state
        .get_membership_handler()
        .handle(GetMembershipQuery { user_id })
        .await?;

    Ok(Json(MembershipResponse { membership }))
}

/// GET /api/memberships - Active plans
pub async fn list_plans(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let memberships = state.list_plans_handler().handle().await?;
    Ok(Json(PlanListResponse { memberships }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/membership - Subscribe to a plan
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<PlanSelectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .add_membership_handler()
        .handle(AddMembershipCommand {
            actor: user_id.clone(),
            user_id,
            membership_id: request.membership_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(result))))
}

/// POST /api/membership/default - Subscribe to the studio's default plan
///
/// Called once after registration. Responds 204 when no default plan is
/// configured or the caller already has a subscription.
pub async fn assign_default(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Response, ApiError> {
    let assigned = state
        .assign_default_membership_handler()
        .handle(AssignDefaultMembershipCommand { user_id })
        .await?;

    Ok(match assigned {
        Some(membership) => (StatusCode::CREATED, Json(membership)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// POST /api/membership/change - Move to another plan
pub async fn change_membership(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<PlanSelectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .change_membership_handler()
        .handle(ChangeMembershipCommand {
            user_id,
            membership_id: request.membership_id,
        })
        .await?;

    Ok(Json(ChangeMembershipResponse::from(result)))
}

/// POST /api/membership/cancel - Cancel once the binding period is over
pub async fn cancel_membership(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .cancel_membership_handler()
        .handle(CancelMembershipCommand { user_id })
        .await?;

    Ok(Json(result.membership))
}

/// POST /api/membership/freeze - Ask staff to freeze the subscription
pub async fn request_freeze(
    state: State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    freeze_step(state, user, FreezeAction::Request).await
}

/// POST /api/membership/freeze/cancel - Withdraw a pending freeze request
pub async fn cancel_freeze_request(
    state: State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    freeze_step(state, user, FreezeAction::CancelRequest).await
}

/// POST /api/membership/unfreeze - Return to active
pub async fn unfreeze(
    state: State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    freeze_step(state, user, FreezeAction::Unfreeze).await
}

async fn freeze_step(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    action: FreezeAction,
) -> Result<Json<TransitionResponse>, ApiError> {
    let result = state
        .freeze_membership_handler()
        .handle(FreezeMembershipCommand {
            actor: user_id.clone(),
            user_id,
            action,
        })
        .await?;

    Ok(Json(TransitionResponse::from(result)))
}
