use tracing::info;
use uuid::Uuid;

use super::repo::{GenerationRecord, NewGeneration};
use crate::error::ApiError;
use crate::generator::GenerationInput;
use crate::ledger::DebitOutcome;
use crate::state::AppState;

/// Credit-gated generation. The balance check, backend call, debit and
/// history insert behave as one unit: nothing is written unless the debit
/// and the record both land.
pub async fn generate(
    state: &AppState,
    account_id: Uuid,
    input: GenerationInput,
) -> Result<GenerationRecord, ApiError> {
    let credits = state
        .ledger
        .account_credits(account_id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;

    // Cheap pre-check so an empty balance never reaches the backend. The
    // conditional debit inside the ledger is authoritative.
    if credits < 1 {
        return Err(ApiError::InsufficientCredits);
    }

    let result_image = state
        .generator
        .generate(&input)
        .await
        .map_err(ApiError::GenerationBackend)?;

    let new = NewGeneration {
        original_image: input.original_image,
        result_image,
        prompt: input.prompt,
        title: input.title,
        subtitle: input.subtitle,
    };

    match state.ledger.debit_and_record(account_id, new).await? {
        DebitOutcome::Recorded(record) => {
            info!(
                account_id = %account_id,
                record_id = %record.id,
                "generation debited and recorded"
            );
            Ok(record)
        }
        DebitOutcome::InsufficientCredits => Err(ApiError::InsufficientCredits),
    }
}

pub async fn history(
    state: &AppState,
    account_id: Uuid,
) -> Result<Vec<GenerationRecord>, ApiError> {
    Ok(state.ledger.history(account_id).await?)
}
