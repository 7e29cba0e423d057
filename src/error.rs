use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy surfaced to API callers. Each variant maps to a stable
/// machine-readable kind so clients can branch without string matching.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("insufficient credits")]
    InsufficientCredits,

    #[error("{0}")]
    Invalid(String),

    #[error("generation backend failed: {0}")]
    GenerationBackend(anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::NotFound(_) => "not_found",
            ApiError::InsufficientCredits => "insufficient_credits",
            ApiError::Invalid(_) => "invalid_request",
            ApiError::GenerationBackend(_) => "generation_backend_failure",
            ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::GenerationBackend(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "request failed");
        }
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_distinguishable() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("account").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InsufficientCredits.status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ApiError::Invalid("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::GenerationBackend(anyhow::anyhow!("down")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn kinds_are_stable_strings() {
        assert_eq!(ApiError::InsufficientCredits.kind(), "insufficient_credits");
        assert_eq!(ApiError::NotFound("account").kind(), "not_found");
        assert_eq!(
            ApiError::GenerationBackend(anyhow::anyhow!("down")).kind(),
            "generation_backend_failure"
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(ApiError::NotFound("account").to_string(), "account not found");
    }
}
