use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Runtime settings, resolved once at startup from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Not validated here; a missing key surfaces on the first question.
    pub api_key: String,
    pub chat_model: String,
    pub api_url: Option<String>,
    pub temperature: Option<f32>,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            api_url: None,
            temperature: None,
            request_timeout: Duration::from_secs(60),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            upload_dir: env::temp_dir(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY").unwrap_or(defaults.api_key);

        let chat_model = get("OPENAI_CHAT_MODEL").unwrap_or(defaults.chat_model);

        let api_url = get("OPENAI_API_URL");

        let temperature = get("OPENAI_TEMPERATURE").and_then(|t| t.parse().ok());

        let request_timeout = get("PDF_CHAT_TIMEOUT_SECS")
            .and_then(|t| t.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_retries = get("PDF_CHAT_MAX_RETRIES")
            .and_then(|r| r.parse().ok())
            .unwrap_or(defaults.max_retries);

        let retry_backoff = get("PDF_CHAT_RETRY_BACKOFF_MS")
            .and_then(|b| b.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_backoff);

        let upload_dir = get("PDF_CHAT_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let max_upload_bytes = get("PDF_CHAT_MAX_UPLOAD_MB")
            .and_then(|m| m.parse::<usize>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.max_upload_bytes);

        Self {
            api_key,
            chat_model,
            api_url,
            temperature,
            request_timeout,
            max_retries,
            retry_backoff,
            upload_dir,
            max_upload_bytes,
        }
    }
}
