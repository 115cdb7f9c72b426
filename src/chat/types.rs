use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Ordered, append-only message log.
///
/// Only whole-conversation `clear` removes entries; individual messages are
/// never edited or dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Sorry, the Gemini model is not available. This might be due to API changes. Please check your API key and try again later.";

pub const INVALID_CREDENTIAL_MESSAGE: &str =
    "Sorry, your Gemini API key appears to be invalid. Please check your API key.";

/// Failure taxonomy of the chat core.
///
/// None of these are fatal. At the dispatcher boundary every dispatch-path
/// kind becomes display text via [`ChatError::user_message`]; persistence
/// failures are reported as warnings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("rate limited, retry in {wait_seconds:.1}s")]
    RateLimited { wait_seconds: f64 },
    #[error("model unavailable")]
    ModelUnavailable,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("unknown error: {0}")]
    Unknown(String),
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl ChatError {
    /// Fixed, user-safe text for this failure
    pub fn user_message(&self) -> String {
        match self {
            ChatError::RateLimited { wait_seconds } => format!(
                "Rate limit exceeded. Please wait {} seconds before making another request.",
                wait_seconds.max(0.0).trunc() as u64
            ),
            ChatError::ModelUnavailable => MODEL_UNAVAILABLE_MESSAGE.to_string(),
            ChatError::InvalidCredential => INVALID_CREDENTIAL_MESSAGE.to_string(),
            ChatError::Unknown(detail) => format!(
                "Sorry, I encountered an error: {}. Please check your Gemini API key and connection.",
                detail
            ),
            ChatError::PersistenceFailure(detail) => {
                format!("Could not save feedback: {}", detail)
            }
        }
    }
}

/// Result of one dispatch, kept tagged until it reaches the display.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Succeeded(String),
    Rejected { wait_seconds: f64 },
    Failed(ChatError),
}

impl DispatchOutcome {
    /// The text shown to the user as the assistant's reply.
    ///
    /// Rejections and failures are rendered as ordinary replies; callers
    /// append them to the conversation like any other assistant message.
    pub fn into_text(self) -> String {
        match self {
            DispatchOutcome::Succeeded(text) => text,
            DispatchOutcome::Rejected { wait_seconds } => {
                ChatError::RateLimited { wait_seconds }.user_message()
            }
            DispatchOutcome::Failed(error) => error.user_message(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Succeeded(_))
    }
}
