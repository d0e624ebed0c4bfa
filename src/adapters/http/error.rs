//! API error type shared by all endpoints.
//!
//! Every module error is reduced to its [`ErrorCode`], which decides the
//! HTTP status. The body is always `{ "code": ..., "message": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::klippekort::KlippekortError;
use crate::domain::membership::MembershipError;

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Error returned from HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "Authentication required")
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.code)
    }
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound
        | ErrorCode::MembershipNotFound
        | ErrorCode::MembershipPlanNotFound
        | ErrorCode::KlippekortNotFound
        | ErrorCode::KlippekortPackageNotFound => StatusCode::NOT_FOUND,
        ErrorCode::MembershipExists
        | ErrorCode::ConcurrentModification
        | ErrorCode::InvalidStateTransition
        | ErrorCode::BindingPeriodActive
        | ErrorCode::InsufficientBalance
        | ErrorCode::KlippekortExpired => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<KlippekortError> for ApiError {
    fn from(err: KlippekortError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::new(err.code, err.message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }
        let body = ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}
