use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::session::{cookie_value, SessionKeys};
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the caller's account id from a valid session cookie.
/// Rejects with `Unauthenticated` otherwise.
pub struct AuthAccount(pub Uuid);

/// Like [`AuthAccount`] but never rejects; `None` when no valid session.
pub struct MaybeAuthAccount(pub Option<Uuid>);

fn session_subject(parts: &Parts, state: &AppState) -> Option<Uuid> {
    let cookie_header = parts
        .headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;
    let token = cookie_value(cookie_header, &state.config.session.cookie_name)?;

    let keys = SessionKeys::from_ref(state);
    match keys.verify(token) {
        Ok(claims) => Some(claims.sub),
        Err(_) => {
            warn!("invalid or expired session token");
            None
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_subject(parts, state)
            .map(AuthAccount)
            .ok_or(ApiError::Unauthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthAccount {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthAccount(session_subject(parts, state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(cookie: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(c) = cookie {
            builder = builder.header(axum::http::header::COOKIE, c);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_cookie_rejects_with_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        let err = AuthAccount::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("should reject");
        assert_eq!(err.kind(), "unauthenticated");
    }

    #[tokio::test]
    async fn valid_session_cookie_yields_account_id() {
        let state = AppState::fake();
        let account_id = Uuid::new_v4();
        let token = SessionKeys::from_ref(&state).sign(account_id).unwrap();
        let cookie = format!("{}={}", state.config.session.cookie_name, token);

        let mut parts = parts_with_cookie(Some(cookie));
        let AuthAccount(got) = AuthAccount::from_request_parts(&mut parts, &state)
            .await
            .expect("should accept");
        assert_eq!(got, account_id);
    }

    #[tokio::test]
    async fn tampered_token_rejects() {
        let state = AppState::fake();
        let token = SessionKeys::from_ref(&state).sign(Uuid::new_v4()).unwrap();
        let cookie = format!("{}={}x", state.config.session.cookie_name, token);

        let mut parts = parts_with_cookie(Some(cookie));
        assert!(AuthAccount::from_request_parts(&mut parts, &state)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn maybe_auth_is_none_without_session() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        let MaybeAuthAccount(got) = MaybeAuthAccount::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(got.is_none());
    }
}
