pub mod gemini_provider;
pub mod provider;
pub mod types;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use provider::ModelBackend;
pub use types::*;
