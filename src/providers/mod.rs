pub mod openai;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use traits::{CompletionProvider, ProviderError};
