use std::time::Duration;

use axum::async_trait;

/// Inputs forwarded to the generation backend. The ledger transaction never
/// sees these; only the resulting image reference comes back.
#[derive(Debug, Default, Clone)]
pub struct GenerationInput {
    pub original_image: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub prompt: Option<String>,
}

/// Capability boundary for the external image generator. A real backend
/// plugs in here without touching the credit transaction.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce a result-image reference for the given inputs.
    async fn generate(&self, input: &GenerationInput) -> anyhow::Result<String>;
}

/// Stand-in backend: waits a fixed delay, then returns a fixed URL.
#[derive(Clone)]
pub struct PlaceholderBackend {
    result_url: String,
    delay: Duration,
}

impl PlaceholderBackend {
    pub fn new(result_url: impl Into<String>, delay: Duration) -> Self {
        Self {
            result_url: result_url.into(),
            delay,
        }
    }
}

#[async_trait]
impl GenerationBackend for PlaceholderBackend {
    async fn generate(&self, _input: &GenerationInput) -> anyhow::Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.result_url.clone())
    }
}
