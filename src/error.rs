use thiserror::Error;

use crate::providers::traits::ProviderError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to parse document: {0}")]
    DocumentParse(String),
    #[error("LLM request failed: {0}")]
    LlmRequest(#[from] ProviderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
