//! HTTP handlers for staff endpoints.
//!
//! The session only identifies the caller; the administrator check happens
//! in the application handlers so that every entry point enforces it.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::membership::dto::{SubscriptionResponse, TransitionResponse};
use crate::adapters::http::middleware::CurrentUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::klippekort::{
    AdjustKlippekortCommand, CreateKlippekortPackageCommand,
};
use crate::application::handlers::membership::{
    AddMembershipCommand, CreateMembershipPlanCommand, FreezeAction, FreezeMembershipCommand,
    GetRulesQuery, RemoveMembershipCommand, UpdateMembershipPlanCommand, UpdateRulesCommand,
};
use crate::domain::foundation::{MembershipId, UserId, UserKlippekortId};
use crate::domain::klippekort::NewKlippekortPackage;
use crate::domain::membership::{MembershipRules, NewMembershipPlan};

use super::dto::{AdjustKlippekortRequest, AssignMembershipRequest, UpdatePlanRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Rules
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/rules
pub async fn get_rules(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rules = state
        .get_rules_handler()
        .handle(GetRulesQuery { actor })
        .await?;
    Ok(Json(rules))
}

/// PUT /api/admin/rules
pub async fn update_rules(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(rules): Json<MembershipRules>,
) -> Result<impl IntoResponse, ApiError> {
    let rules = state
        .update_rules_handler()
        .handle(UpdateRulesCommand { actor, rules })
        .await?;
    Ok(Json(rules))
}

// ════════════════════════════════════════════════════════════════════════════════
// Member subscriptions
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/users/:user_id/membership
pub async fn assign_membership(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<String>,
    Json(request): Json<AssignMembershipRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .add_membership_handler()
        .handle(AddMembershipCommand {
            actor,
            user_id: UserId::new(user_id)?,
            membership_id: request.membership_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(result))))
}

/// DELETE /api/admin/users/:user_id/membership - Terminate regardless of binding
pub async fn remove_membership(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .remove_membership_handler()
        .handle(RemoveMembershipCommand {
            actor,
            user_id: UserId::new(user_id)?,
        })
        .await?;

    Ok(Json(result.membership))
}

/// POST /api/admin/users/:user_id/freeze/approve
pub async fn approve_freeze(
    state: State<AppState>,
    actor: CurrentUser,
    user_id: Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    decide_freeze(state, actor, user_id, FreezeAction::Approve).await
}

/// POST /api/admin/users/:user_id/freeze/reject
pub async fn reject_freeze(
    state: State<AppState>,
    actor: CurrentUser,
    user_id: Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    decide_freeze(state, actor, user_id, FreezeAction::Reject).await
}

async fn decide_freeze(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<String>,
    action: FreezeAction,
) -> Result<Json<TransitionResponse>, ApiError> {
    let result = state
        .freeze_membership_handler()
        .handle(FreezeMembershipCommand {
            actor,
            user_id: UserId::new(user_id)?,
            action,
        })
        .await?;

    Ok(Json(TransitionResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Klippekort
// ════════════════════════════════════════════════════════════════════════════════

/// PUT /api/admin/klippekort/:id - Set the remaining balance
pub async fn adjust_klippekort(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(klippekort_id): Path<UserKlippekortId>,
    Json(request): Json<AdjustKlippekortRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let klippekort = state
        .adjust_klippekort_handler()
        .handle(AdjustKlippekortCommand {
            actor,
            klippekort_id,
            remaining_klipp: request.remaining_klipp,
        })
        .await?;

    Ok(Json(klippekort))
}

// ════════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/memberships
pub async fn create_plan(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(plan): Json<NewMembershipPlan>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .create_plan_handler()
        .handle(CreateMembershipPlanCommand { actor, plan })
        .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

/// PATCH /api/admin/memberships/:id
pub async fn update_plan(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(membership_id): Path<MembershipId>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .update_plan_handler()
        .handle(UpdateMembershipPlanCommand {
            actor,
            membership_id,
            price: request.price,
            active: request.active,
        })
        .await?;

    Ok(Json(plan))
}

/// POST /api/admin/klippekort-packages
pub async fn create_package(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(package): Json<NewKlippekortPackage>,
) -> Result<impl IntoResponse, ApiError> {
    let package = state
        .create_package_handler()
        .handle(CreateKlippekortPackageCommand { actor, package })
        .await?;

    Ok((StatusCode::CREATED, Json(package)))
}
