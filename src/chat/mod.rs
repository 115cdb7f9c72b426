pub mod types;
pub mod rate_limiter;
pub mod history;
pub mod model_client;
pub mod dispatcher;
pub mod feedback;
pub mod display;
pub mod session;


pub use types::*;
pub use rate_limiter::{Clock, ManualClock, RateDecision, RateLimitConfig, RateLimiter, RateWindow, SystemClock};
pub use history::HistoryTranslator;
pub use model_client::{ModelClient, classify_error};
pub use dispatcher::Dispatcher;
pub use feedback::{FeedbackEntry, FeedbackLabel, FeedbackLog, FeedbackSink};
pub use display::{ConversationDisplay, RecordingDisplay, TerminalDisplay};
pub use session::{ChatSession, SessionOptions};
