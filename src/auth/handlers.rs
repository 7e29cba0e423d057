use axum::{
    extract::{FromRef, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::dto::{LoginRequest, LogoutResponse};
use super::extractors::MaybeAuthAccount;
use super::session::{expired_cookie, session_cookie, SessionKeys};
use crate::accounts::repo::{self, Account};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Session establishment: upserts the account for an already-verified OAuth
/// identity and sets the session cookie. The code exchange itself happens
/// upstream of this service.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<Account>), ApiError> {
    payload.open_id = payload.open_id.trim().to_string();
    if payload.open_id.is_empty() {
        warn!("login with empty openId");
        return Err(ApiError::Invalid("openId is required".into()));
    }

    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(ApiError::Invalid("invalid email".into()));
        }
    }

    let account = repo::upsert_on_login(
        &state.db,
        &payload.open_id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.login_method.as_deref(),
    )
    .await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(account.id)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        session_cookie(
            &state.config.session.cookie_name,
            &token,
            keys.ttl,
            state.config.session.cookie_secure,
        )
        .parse()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("set-cookie header: {e}")))?,
    );

    info!(account_id = %account.id, open_id = %account.open_id, "account signed in");
    Ok((headers, Json(account)))
}

/// Current caller identity, or JSON `null` when no valid session is present.
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    MaybeAuthAccount(account_id): MaybeAuthAccount,
) -> Result<Json<Option<Account>>, ApiError> {
    let account = match account_id {
        Some(id) => repo::find_by_id(&state.db, id).await?,
        None => None,
    };
    Ok(Json(account))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<(HeaderMap, Json<LogoutResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        expired_cookie(
            &state.config.session.cookie_name,
            state.config.session.cookie_secure,
        )
        .parse()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("set-cookie header: {e}")))?,
    );
    Ok((headers, Json(LogoutResponse { success: true })))
}
