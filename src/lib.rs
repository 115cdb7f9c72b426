//! # gemchat
//!
//! A single-session conversational front-end for Google Gemini. User text
//! goes through a per-session rate limiter, is translated into Gemini's
//! chat format, and is sent to the first available model in a fallback
//! chain. Every outcome, including rate-limit rejections and API errors,
//! comes back as text the display can show.
//!
//! ## Architecture Overview
//!
//! - **[`chat`]**: the conversation core: rate limiting, history
//!   translation, the model client, the dispatcher, feedback and sessions
//! - **[`llm`]**: the provider seam and the Gemini REST backend
//! - **[`integration`]**: assembles sessions from configuration
//! - **[`cli`]**: argument parsing and configuration discovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemchat::{ChatConfig, ChatSystem, TerminalDisplay};
//! use gemchat::llm::ApiKey;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let system = ChatSystem::new(ChatConfig::default())?;
//!     let mut session = system.new_session(ApiKey::new("my-key").expect("key"));
//!     let mut display = TerminalDisplay::stdout(false);
//!
//!     session.start(&mut display)?;
//!     session.submit("What's a good name for a cat?", &mut display).await?;
//!     Ok(())
//! }
//! ```

/// Conversation core.
///
/// Rate limiting, Gemini history translation, model fallback and error
/// classification, dispatch, feedback persistence and session handling.
pub mod chat;

/// Provider abstraction and the Gemini REST implementation.
pub mod llm;

/// Session assembly from configuration.
pub mod integration;

/// Environment constants and path utilities.
///
/// Centralizes fixed limits, model identifiers, persona text and file names.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use chat::{
    ChatError, ChatSession, Conversation, ConversationDisplay, DispatchOutcome, Dispatcher,
    FeedbackLabel, HistoryTranslator, Message, ModelClient, RateLimiter, RecordingDisplay, Role,
    TerminalDisplay,
};
pub use cli::{ChatConfig, ConfigDiscovery};
pub use integration::ChatSystem;
pub use llm::{ApiKey, GeminiProvider, LLMError, ModelBackend};
