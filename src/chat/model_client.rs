use crate::chat::types::ChatError;
use crate::llm::provider::ModelBackend;
use crate::llm::types::{ApiKey, Content, LLMError, ModelHandle};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Map a provider error description onto the chat error taxonomy.
///
/// Matching is on substrings of the description. A credential failure wins
/// over everything else, so a message mentioning both a 404 and
/// `API_KEY_INVALID` is reported as a bad key.
pub fn classify_error(description: &str) -> ChatError {
    if description.contains("API_KEY_INVALID") {
        ChatError::InvalidCredential
    } else if description.contains("404") && description.contains("not found") {
        ChatError::ModelUnavailable
    } else {
        ChatError::Unknown(description.to_string())
    }
}

/// A chat opened on one model, seeded with prior turns.
///
/// Each `send_message` sends the whole history plus the new user turn and,
/// on success, records both the turn and the reply.
pub struct ModelChat<'a> {
    backend: &'a dyn ModelBackend,
    model: ModelHandle,
    api_key: &'a ApiKey,
    history: Vec<Content>,
}

impl<'a> ModelChat<'a> {
    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    pub async fn send_message(&mut self, text: &str) -> Result<String, LLMError> {
        let mut contents = self.history.clone();
        contents.push(Content::user(text));

        let reply = self
            .backend
            .generate(&self.model, self.api_key, contents)
            .await?;

        self.history.push(Content::user(text));
        self.history.push(Content::model(reply.clone()));
        Ok(reply)
    }
}

/// Performs the remote call for one dispatch.
///
/// Model selection walks the configured identifiers in order and stops at
/// the first one that initializes. This happens once per `send`, before any
/// message goes out; it is not a request retry.
pub struct ModelClient {
    backend: Arc<dyn ModelBackend>,
    models: Vec<String>,
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("provider", &self.backend.provider_name())
            .field("models", &self.models)
            .finish()
    }
}

impl ModelClient {
    pub fn new(backend: Arc<dyn ModelBackend>, models: Vec<String>) -> Self {
        Self { backend, models }
    }

    /// Client over the built-in fallback chain
    pub fn with_default_models(backend: Arc<dyn ModelBackend>) -> Self {
        let models = crate::env::gemini::MODEL_FALLBACK_CHAIN
            .iter()
            .map(|m| m.to_string())
            .collect();
        Self::new(backend, models)
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Open the first available model; on total failure, the last
    /// identifier's error is returned.
    pub async fn open_model(&self, api_key: &ApiKey) -> Result<ModelHandle, LLMError> {
        let mut last_error = LLMError::InvalidModel("no model identifiers configured".to_string());

        for model in &self.models {
            match self.backend.open_model(model, api_key).await {
                Ok(handle) => {
                    debug!("Using model {} via {}", handle.name, self.backend.provider_name());
                    return Ok(handle);
                }
                Err(e) => {
                    warn!("Model {} failed to initialize: {}", model, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    pub fn start_chat<'a>(
        &'a self,
        model: ModelHandle,
        api_key: &'a ApiKey,
        history: Vec<Content>,
    ) -> ModelChat<'a> {
        ModelChat {
            backend: self.backend.as_ref(),
            model,
            api_key,
            history,
        }
    }

    /// Send `last_message` as the live turn after `history`.
    pub async fn send(
        &self,
        history: Vec<Content>,
        last_message: &str,
        api_key: &ApiKey,
    ) -> Result<String, ChatError> {
        let result = async {
            let model = self.open_model(api_key).await?;
            let mut chat = self.start_chat(model, api_key, history);
            chat.send_message(last_message).await
        }
        .await;

        match result {
            Ok(text) => {
                info!("Received reply ({} chars)", text.chars().count());
                Ok(text)
            }
            Err(e) => {
                let description = e.to_string();
                warn!("Model call failed: {}", description);
                Err(classify_error(&description))
            }
        }
    }
}
