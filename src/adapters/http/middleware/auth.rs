//! Authentication extractor for axum.
//!
//! `CurrentUser` resolves the caller's session through the
//! `SessionResolver` port. The token is read from the `Authorization`
//! header:
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! or, failing that, from the `session` cookie. A missing, unknown or
//! expired token is rejected with 401.
//!
//! # Example
//!
//! ```ignore
//! async fn my_handler(CurrentUser(user_id): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user_id)
//! }
//! ```

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::UserId;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;

        let sessions = &state.sessions;
        let user_id = state
            .storage
            .call("resolve_session", || sessions.resolve(&token))
            .await?;

        match user_id {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => {
                tracing::debug!("session token rejected");
                Err(ApiError::unauthorized())
            }
        }
    }
}

/// Extracts the session token from the bearer header or the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_token_is_extracted() {
        let h = headers(&[(AUTHORIZATION, "Bearer abc123")]);
        assert_eq!(session_token(&h), Some("abc123".to_string()));
    }

    #[test]
    fn session_cookie_is_extracted() {
        let h = headers(&[(COOKIE, "theme=dark; session=tok-9; lang=nb")]);
        assert_eq!(session_token(&h), Some("tok-9".to_string()));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let h = headers(&[(AUTHORIZATION, "Bearer from-header"), (COOKIE, "session=from-cookie")]);
        assert_eq!(session_token(&h), Some("from-header".to_string()));
    }

    #[test]
    fn missing_or_blank_token_is_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        assert_eq!(session_token(&headers(&[(AUTHORIZATION, "Bearer ")])), None);
        assert_eq!(session_token(&headers(&[(AUTHORIZATION, "Basic xyz")])), None);
        assert_eq!(session_token(&headers(&[(COOKIE, "session=")])), None);
    }
}
