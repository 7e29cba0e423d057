use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{GenerateRequest, GenerateResponse};
use super::repo::GenerationRecord;
use super::service;
use crate::auth::extractors::AuthAccount;
use crate::error::ApiError;
use crate::generator::GenerationInput;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generation/generate", post(generate))
        .route("/generation/history", get(get_history))
}

#[instrument(skip(state, body))]
pub async fn generate(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let record = service::generate(
        &state,
        account_id,
        GenerationInput {
            original_image: body.original_image,
            title: body.title,
            subtitle: body.subtitle,
            prompt: None,
        },
    )
    .await?;

    Ok(Json(GenerateResponse {
        result_image: record.result_image,
    }))
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
) -> Result<Json<Vec<GenerationRecord>>, ApiError> {
    let records = service::history(&state, account_id).await?;
    Ok(Json(records))
}
