use crate::chat::history::HistoryTranslator;
use crate::chat::model_client::ModelClient;
use crate::chat::rate_limiter::{RateDecision, RateLimiter};
use crate::chat::types::{ChatError, DispatchOutcome, Message};
use crate::llm::types::ApiKey;
use tracing::debug;

/// Phases of a single dispatch, for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Ready,
    CheckingLimit,
    Rejected,
    Translating,
    Calling,
    Succeeded,
    Failed,
}

/// Rate check → translate → remote call, for one session.
///
/// The dispatcher owns the session's rate window. One request is processed
/// to completion before the next; there is no cancellation and no retry.
#[derive(Debug)]
pub struct Dispatcher {
    rate_limiter: RateLimiter,
    client: ModelClient,
}

impl Dispatcher {
    pub fn new(rate_limiter: RateLimiter, client: ModelClient) -> Self {
        Self {
            rate_limiter,
            client,
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn rate_limiter_mut(&mut self) -> &mut RateLimiter {
        &mut self.rate_limiter
    }

    fn enter(phase: DispatchPhase) {
        debug!(?phase, "dispatch phase");
    }

    /// Dispatch and keep the outcome tagged.
    pub async fn dispatch(&mut self, conversation: &[Message], api_key: &ApiKey) -> DispatchOutcome {
        Self::enter(DispatchPhase::CheckingLimit);
        if let RateDecision::Rejected { wait_seconds } = self.rate_limiter.check() {
            Self::enter(DispatchPhase::Rejected);
            Self::enter(DispatchPhase::Ready);
            return DispatchOutcome::Rejected { wait_seconds };
        }

        let Some(last) = conversation.last() else {
            Self::enter(DispatchPhase::Failed);
            Self::enter(DispatchPhase::Ready);
            return DispatchOutcome::Failed(ChatError::Unknown(
                "conversation is empty".to_string(),
            ));
        };

        Self::enter(DispatchPhase::Translating);
        let mut history = HistoryTranslator::translate(conversation);
        history.pop();

        Self::enter(DispatchPhase::Calling);
        let outcome = match self.client.send(history, &last.content, api_key).await {
            Ok(text) => {
                Self::enter(DispatchPhase::Succeeded);
                DispatchOutcome::Succeeded(text)
            }
            Err(error) => {
                Self::enter(DispatchPhase::Failed);
                DispatchOutcome::Failed(error)
            }
        };

        Self::enter(DispatchPhase::Ready);
        outcome
    }

    /// Dispatch and render the outcome as reply text. Never fails: rate
    /// limit rejections and errors come back as displayable strings.
    pub async fn send(&mut self, conversation: &[Message], api_key: &ApiKey) -> String {
        self.dispatch(conversation, api_key).await.into_text()
    }
}
