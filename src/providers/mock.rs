use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

use crate::providers::traits::{CompletionProvider, ProviderError};

/// Scripted provider for tests. Replies are consumed in order; once the
/// script runs out every call returns `fallback`.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: String,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: reply.to_string(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_script(
        script: Vec<Result<String, ProviderError>>,
        fallback: &str,
    ) -> Self {
        let provider = Self::replying(fallback);
        *provider.script.lock() = script.into();
        provider
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// (system_message, prompt) pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .push((system_message.to_string(), prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(next) => next,
            None => Ok(self.fallback.clone()),
        }
    }

    fn get_model_info(&self) -> String {
        "mock-model".to_string()
    }
}
