//! Environment constants and path utilities for gemchat.
//!
//! This module centralizes the fixed configuration of the chat front-end:
//! rate limit defaults, the model fallback chain, persona text, and the
//! file names used for configuration and feedback.

/// Application directory name (hidden directory like .git, .vscode)
pub const APP_DIR_NAME: &str = ".gemchat";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name when placed directly in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "gemchat.toml";

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Where users obtain an API key
pub const API_KEY_HELP_URL: &str = "https://aistudio.google.com/app/apikey";

/// Rate limiting defaults
pub mod rate_limit {
    /// Requests allowed per window
    pub const MAX_REQUESTS: u32 = 30;

    /// Window length in seconds
    pub const WINDOW_SECONDS: u64 = 60;
}

/// Gemini provider constants
pub mod gemini {
    /// Public Generative Language API endpoint
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

    /// REST API version segment
    pub const DEFAULT_API_VERSION: &str = "v1beta";

    /// Header carrying the API key
    pub const API_KEY_HEADER: &str = "x-goog-api-key";

    /// Model identifiers, tried in order until one initializes
    pub const MODEL_FALLBACK_CHAIN: [&str; 3] =
        ["gemini-2.0-flash", "gemini-flash-latest", "gemini-pro-latest"];
}

/// Conversation text constants
pub mod persona {
    /// Model-role entry emitted after every translated system message.
    /// Gemini has no system role, so instructions travel as a user turn
    /// followed by this acknowledgment.
    pub const SYSTEM_ACKNOWLEDGMENT: &str = "Understood. I will follow these instructions.";

    /// First assistant message of a fresh conversation
    pub const GREETING: &str = "hey! 👋 I can help with questions, explain concepts, chat casually, or write/run small code snippets. what are you working on today?";

    /// Static system prompt defining assistant behavior
    pub const ASSISTANT_PERSONA: &str = r#"You are a helpful, friendly, and knowledgeable AI assistant.
Primary goals:
- Answer open-domain questions accurately and concisely.
- Handle casual small talk naturally.
- Ask at most one clarifying question only when essential.
- Be safe, polite, and non-judgmental.

Persona & Tone:
- Warm, calm, and upbeat.
- Use plain language.
- Emojis sparingly (max 1 per short reply, 2 for longer replies).
- Match the user's formality and language (English/Hinglish allowed).

Conversation Rules:
- Greet naturally on first contact. If user shares a name, use it later.
- Keep most answers to 3–7 sentences unless the user asks for detail.
- For lists, prefer short bullet points.
- If you don't know, say so and suggest next steps.
- If the question is ambiguous, ask one crisp clarifier.
- If you make an assumption, state it briefly.

Knowledge & Reasoning:
- Use general knowledge. If external "context" is provided (RAG), rely on it first.
- If context conflicts with prior knowledge, prefer the provided context.
- For math/logic, show key steps briefly and the final answer.
- For code, provide runnable, minimal examples with language-tagged fences.
- Cite sources only if provided. Don't fabricate citations.

Safety:
- Avoid harmful instructions, self-harm facilitation, illegal activity, or personal data extraction.
- For medical, legal, or financial topics: provide general information, not professional advice; encourage consulting a professional when appropriate.
- No NSFW content.

Small Talk & Social:
- Handle greetings, feelings, and light banter naturally.
- Be supportive and positive; don't overuse emojis.
- If the user seems upset, be empathetic and concise.

Formatting:
- Default to clean Markdown: short paragraphs, bullets, and tables when helpful.
- Use code blocks for code.
- Keep tables small and readable.

Clarifying Policy:
- Ask one clarifying question only if the user's goal cannot be met without it. Otherwise, proceed with a sensible assumption and note it briefly.

When Unsure:
- Say "I'm not sure" or "I don't have enough info."
- Offer one or two concrete ways to find the answer or move forward.

RAG Context Handling (if provided):
- Summarize the most relevant snippets in your own words.
- Quote minimally (1–2 lines) only if precision matters.
- If no relevant context found, say so and answer from general knowledge or ask for more info."#;
}

/// Feedback log constants
pub mod feedback {
    /// Default feedback log file, relative to the working directory
    pub const LOG_FILE_NAME: &str = "feedback_log.json";
}

/// Common path utilities
use std::path::{Path, PathBuf};

/// Build the application directory path from a base directory
pub fn app_dir_path(base: &Path) -> PathBuf {
    base.join(APP_DIR_NAME)
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    app_dir_path(home_dir)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    app_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

/// Build the default feedback log path in a directory
pub fn feedback_log_path(dir: &Path) -> PathBuf {
    dir.join(feedback::LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.gemchat/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/.gemchat/config.toml")
        );

        assert_eq!(
            feedback_log_path(current_dir),
            Path::new("/current/project/feedback_log.json")
        );
    }

    #[test]
    fn test_fallback_chain_order() {
        assert_eq!(gemini::MODEL_FALLBACK_CHAIN[0], "gemini-2.0-flash");
        assert_eq!(gemini::MODEL_FALLBACK_CHAIN[2], "gemini-pro-latest");
    }
}
