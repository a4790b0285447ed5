pub mod answerer;

pub use answerer::{build_prompt, QuestionAnswerer, SYSTEM_MESSAGE};
