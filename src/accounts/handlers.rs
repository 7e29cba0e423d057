use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo::{self, Account};
use crate::auth::extractors::AuthAccount;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(get_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
) -> Result<Json<Account>, ApiError> {
    let account = repo::find_by_id(&state.db, account_id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;
    Ok(Json(account))
}
