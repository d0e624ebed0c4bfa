//! HTTP middleware and extractors.

mod auth;

pub use auth::{CurrentUser, SESSION_COOKIE};
