use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Upstream server error: {0}")]
    Upstream(String),
    #[error("API returned error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Network(_)
                | ProviderError::Timeout(_)
                | ProviderError::RateLimited(_)
                | ProviderError::Upstream(_)
        )
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ProviderError>;

    fn get_model_info(&self) -> String;
}
