pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod providers;

// Re-export commonly used items
pub use config::AppConfig;
pub use error::AppError;
pub use knowledge::{KnowledgeBase, KnowledgeStore};
pub use llm::QuestionAnswerer;
