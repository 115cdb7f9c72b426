//! # Session Assembly
//!
//! Wires configuration, the Gemini backend, the rate limiter and the
//! feedback log into a ready-to-use [`ChatSession`].
//!
//! ```text
//! ┌──────────────────────────── ChatSession ────────────────────────────┐
//! │  Conversation   FeedbackLog   Dispatcher                            │
//! │                               ├─ RateLimiter (per session)          │
//! │                               ├─ HistoryTranslator                  │
//! │                               └─ ModelClient ── Arc<GeminiProvider> │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gemchat::{ChatConfig, ChatSystem, RecordingDisplay};
//! use gemchat::llm::ApiKey;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let system = ChatSystem::new(ChatConfig::default())?;
//!     let api_key = ApiKey::new("my-key").expect("non-empty key");
//!     let mut session = system.new_session(api_key);
//!
//!     let mut display = RecordingDisplay::default();
//!     session.start(&mut display)?;
//!     session.submit("Tell me a joke", &mut display).await?;
//!     Ok(())
//! }
//! ```

use crate::chat::{
    ChatSession, Dispatcher, FeedbackLog, FeedbackSink, ModelClient, RateLimiter,
};
use crate::cli::ChatConfig;
use crate::llm::{ApiKey, GeminiProvider, ModelBackend};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shared pieces from which sessions are built.
///
/// The backend and feedback log are shared; each session gets its own
/// dispatcher and rate window.
pub struct ChatSystem {
    config: ChatConfig,
    backend: Arc<dyn ModelBackend>,
    feedback: Arc<dyn FeedbackSink>,
}

impl ChatSystem {
    pub fn new(config: ChatConfig) -> Result<Self> {
        config.validate()?;
        let provider =
            GeminiProvider::new(config.gemini_config()).context("Failed to set up Gemini client")?;
        let feedback = Arc::new(FeedbackLog::new(config.feedback.log_path.clone()));
        Ok(Self::with_parts(config, Arc::new(provider), feedback))
    }

    pub fn with_parts(
        config: ChatConfig,
        backend: Arc<dyn ModelBackend>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        info!(
            "Chat system ready: provider={}, models={:?}",
            backend.provider_name(),
            config.models.fallback
        );
        Self {
            config,
            backend,
            feedback,
        }
    }

    /// Replace the feedback destination with a JSON log at `path`
    pub fn with_feedback_log(mut self, path: PathBuf) -> Self {
        self.feedback = Arc::new(FeedbackLog::new(path));
        self
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn new_session(&self, api_key: ApiKey) -> ChatSession {
        let rate_limiter = RateLimiter::new(self.config.rate_limit_config());
        let client = ModelClient::new(Arc::clone(&self.backend), self.config.models.fallback.clone());

        ChatSession::new(
            Dispatcher::new(rate_limiter, client),
            api_key,
            Arc::clone(&self.feedback),
            self.config.session_options(),
        )
    }
}
