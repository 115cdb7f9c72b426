use crate::llm::types::{ApiKey, Content, LLMError, ModelHandle};
use futures::future::BoxFuture;

/// Remote chat model service.
///
/// Implementations are shared across sessions behind an `Arc`, so they
/// hold no per-conversation state. Rate limiting lives with the session,
/// not the backend.
pub trait ModelBackend: Send + Sync {
    /// Initialize a model by identifier.
    ///
    /// A failure here means the model is not usable with this key and the
    /// caller should move on to the next identifier in its fallback chain.
    fn open_model<'a>(
        &'a self,
        model: &'a str,
        api_key: &'a ApiKey,
    ) -> BoxFuture<'a, Result<ModelHandle, LLMError>>;

    /// Run one turn: `contents` is the full chat (history plus the live
    /// user turn, last). Returns the model's reply text.
    fn generate<'a>(
        &'a self,
        model: &'a ModelHandle,
        api_key: &'a ApiKey,
        contents: Vec<Content>,
    ) -> BoxFuture<'a, Result<String, LLMError>>;

    /// Get provider name/identifier
    fn provider_name(&self) -> &'static str;
}
