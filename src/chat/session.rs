use crate::chat::dispatcher::Dispatcher;
use crate::chat::display::ConversationDisplay;
use crate::chat::feedback::{FeedbackEntry, FeedbackLabel, FeedbackSink};
use crate::chat::rate_limiter::RateLimiterStatus;
use crate::chat::types::{ChatError, Conversation, DispatchOutcome, Message, Role};
use crate::env;
use crate::llm::types::ApiKey;
use chrono::Local;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Text seeded into every fresh conversation
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Sent as a system message at the start of the conversation
    pub persona: Option<String>,
    /// Shown as the first assistant message, never sent to the model
    pub greeting: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            persona: Some(env::persona::ASSISTANT_PERSONA.to_string()),
            greeting: Some(env::persona::GREETING.to_string()),
        }
    }
}

/// One user's conversation with the assistant.
///
/// Owns the conversation log and the dispatcher (and with it the rate
/// window), so sessions never share limiter state. Every message the
/// session adds is pushed to the display as it is appended.
pub struct ChatSession {
    id: Uuid,
    conversation: Conversation,
    conversation_count: u32,
    greeted: bool,
    dispatcher: Dispatcher,
    api_key: ApiKey,
    feedback: Arc<dyn FeedbackSink>,
    options: SessionOptions,
}

impl ChatSession {
    pub fn new(
        dispatcher: Dispatcher,
        api_key: ApiKey,
        feedback: Arc<dyn FeedbackSink>,
        options: SessionOptions,
    ) -> Self {
        let id = Uuid::new_v4();
        info!("Created chat session {}", id);
        Self {
            id,
            conversation: Conversation::new(),
            conversation_count: 0,
            greeted: false,
            dispatcher,
            api_key,
            feedback,
            options,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Number of user prompts since the conversation started or was cleared
    pub fn conversation_count(&self) -> u32 {
        self.conversation_count
    }

    pub fn rate_status(&self) -> RateLimiterStatus {
        self.dispatcher.rate_limiter().get_status()
    }

    fn push(&mut self, message: Message, display: &mut dyn ConversationDisplay) -> io::Result<()> {
        display.append(&message)?;
        self.conversation.push(message);
        Ok(())
    }

    /// Seed the persona into an untouched conversation and show the
    /// greeting.
    ///
    /// The greeting is display-only: it is never part of the history sent
    /// to the model and cannot be rated.
    pub fn start(&mut self, display: &mut dyn ConversationDisplay) -> io::Result<()> {
        if !self.conversation.is_empty() || self.greeted {
            return Ok(());
        }
        if let Some(persona) = self.options.persona.clone() {
            self.push(Message::system(persona), display)?;
        }
        if let Some(greeting) = &self.options.greeting {
            display.append(&Message::assistant(greeting.as_str()))?;
        }
        self.greeted = true;
        Ok(())
    }

    /// Append the prompt, dispatch, and append the reply.
    ///
    /// Whatever the dispatch outcome, its text is appended as the
    /// assistant's reply. Blank prompts are ignored and return `None`.
    pub async fn submit(
        &mut self,
        prompt: &str,
        display: &mut dyn ConversationDisplay,
    ) -> io::Result<Option<DispatchOutcome>> {
        if prompt.trim().is_empty() {
            return Ok(None);
        }

        self.push(Message::user(prompt), display)?;
        self.conversation_count += 1;

        let outcome = self
            .dispatcher
            .dispatch(self.conversation.messages(), &self.api_key)
            .await;

        self.push(Message::assistant(outcome.clone().into_text()), display)?;
        Ok(Some(outcome))
    }

    /// Drop the conversation, zero the prompt count, reset the rate window,
    /// and start over.
    pub fn clear(&mut self, display: &mut dyn ConversationDisplay) -> io::Result<()> {
        info!("Clearing conversation for session {}", self.id);
        self.conversation.clear();
        self.conversation_count = 0;
        self.greeted = false;
        self.dispatcher.rate_limiter_mut().reset();
        display.reset()?;
        self.start(display)
    }

    /// Record feedback on the most recent message.
    ///
    /// Returns `Ok(false)` when there is nothing to rate: an empty
    /// conversation, or one holding only the seeded persona. A storage failure
    /// comes back as `ChatError::PersistenceFailure`; the session is
    /// unaffected either way.
    pub async fn record_feedback(&self, label: FeedbackLabel) -> Result<bool, ChatError> {
        let Some(last) = self.conversation.last().filter(|m| m.role != Role::System) else {
            return Ok(false);
        };

        let entry = FeedbackEntry {
            timestamp: Local::now(),
            message: last.clone(),
            feedback: label,
        };

        match self.feedback.append(entry).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Feedback for session {} not saved: {}", self.id, e);
                Err(e)
            }
        }
    }
}
