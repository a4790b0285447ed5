use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::providers::traits::{CompletionProvider, ProviderError};

pub const SYSTEM_MESSAGE: &str =
    "You are a knowledgeable assistant. Answer using only the information you are given.";

pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Based on the following information:\n\n{}\n\nAnswer the question: {}",
        context, question
    )
}

/// Sends document questions to a [`CompletionProvider`].
///
/// Each attempt is bounded by `timeout`. Transient failures are retried up
/// to `max_retries` more times, doubling `retry_backoff` between attempts.
///
/// The OpenAI client backs off on 429 and 5xx responses on its own, so a
/// rate-limited or overloaded provider usually shows up here as a timeout
/// rather than as `RateLimited`/`Upstream`. One `answer` call can therefore
/// take up to [`QuestionAnswerer::worst_case_latency`]: with the defaults,
/// three 60 s attempts plus 1.5 s of backoff.
pub struct QuestionAnswerer {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl QuestionAnswerer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        let defaults = AppConfig::default();
        Self {
            provider,
            timeout: defaults.request_timeout,
            max_retries: defaults.max_retries,
            retry_backoff: defaults.retry_backoff,
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &AppConfig) -> Self {
        Self::new(provider)
            .with_timeout(config.request_timeout)
            .with_retries(config.max_retries, config.retry_backoff)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, retry_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = retry_backoff;
        self
    }

    /// Upper bound on how long [`answer`](Self::answer) can run when every
    /// attempt times out.
    pub fn worst_case_latency(&self) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        let mut total = self.timeout.saturating_mul(attempts);
        let mut backoff = self.retry_backoff;
        for _ in 0..self.max_retries {
            total = total.saturating_add(backoff);
            backoff = backoff.saturating_mul(2);
        }
        total
    }

    pub fn model(&self) -> String {
        self.provider.get_model_info()
    }

    /// The caller guarantees a non-empty question and context.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(question, context);
        let mut backoff = self.retry_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt(&prompt).await {
                Ok(reply) => {
                    info!(attempt, chars = reply.len(), "Received answer from provider");
                    return Ok(reply);
                }
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    warn!(attempt, "Transient provider error, retrying in {:?}: {}", backoff, e);
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => {
                    warn!(attempt, "Provider request failed: {}", e);
                    return Err(AppError::LlmRequest(e));
                }
            }
        }
    }

    async fn attempt(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, self.provider.complete(SYSTEM_MESSAGE, prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        }
    }
}
