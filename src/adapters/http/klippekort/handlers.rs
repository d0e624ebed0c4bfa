//! HTTP handlers for member-facing klippekort endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::CurrentUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::klippekort::{
    ConsumeKlippekortCommand, GetKlippekortQuery, PurchaseKlippekortCommand,
};
use crate::domain::foundation::UserKlippekortId;

use super::dto::{
    ConsumeKlippekortRequest, ConsumeKlippekortResponse, KlippekortListResponse,
    PackageListResponse, PurchaseKlippekortRequest, PurchaseKlippekortResponse,
};

/// GET /api/klippekort - The caller's cards with progress and expiry
pub async fn list_klippekort(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let klippekort = state
        .get_klippekort_handler()
        .handle(GetKlippekortQuery { user_id })
        .await?;

    Ok(Json(KlippekortListResponse { klippekort }))
}

/// GET /api/klippekort/packages - Active packages with price per session
pub async fn list_packages(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let packages = state.list_packages_handler().handle().await?;
    Ok(Json(PackageListResponse { packages }))
}

/// POST /api/klippekort - Buy a card
pub async fn purchase_klippekort(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<PurchaseKlippekortRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .purchase_klippekort_handler()
        .handle(PurchaseKlippekortCommand {
            actor: user_id.clone(),
            user_id,
            package_id: request.package_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseKlippekortResponse::from(result)),
    ))
}

/// POST /api/klippekort/:id/consume - Spend sessions
pub async fn consume_klippekort(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(klippekort_id): Path<UserKlippekortId>,
    Json(request): Json<ConsumeKlippekortRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .consume_klippekort_handler()
        .handle(ConsumeKlippekortCommand {
            user_id,
            klippekort_id,
            count: request.count,
        })
        .await?;

    Ok(Json(ConsumeKlippekortResponse::from(result)))
}
