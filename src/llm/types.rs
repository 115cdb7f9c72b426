use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles understood by the provider. Gemini only knows "user" and "model".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

/// A single text part of a provider turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One turn in the provider's wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: ProviderRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: ProviderRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ProviderRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ProviderRole::Model, text)
    }

    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// A model that initialized successfully and can take turns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub name: String,
}

/// Secret API credential. Never printed through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for empty or whitespace-only keys, which count as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Provider-level failures.
///
/// The `Display` output is the error description that gets classified
/// further up, so API errors keep the HTTP status and the provider's
/// reason code in the rendered text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LLMError {
    #[error("{status} {message}{}", reason_suffix(.reason))]
    Api {
        status: u16,
        message: String,
        reason: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid model identifier: {0}")]
    InvalidModel(String),
    #[error("Response contained no text")]
    EmptyResponse,
    #[error("Malformed response: {0}")]
    Serialization(String),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" [reason: {}]", r))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_blank() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   \n").is_none());
        assert_eq!(ApiKey::new(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        assert!(!format!("{:?}", key).contains("super-secret"));
    }

    #[test]
    fn test_api_error_display_includes_reason() {
        let err = LLMError::Api {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
            reason: Some("API_KEY_INVALID".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "400 API key not valid. Please pass a valid API key. [reason: API_KEY_INVALID]"
        );

        let err = LLMError::Api {
            status: 404,
            message: "models/foo is not found".to_string(),
            reason: None,
        };
        assert_eq!(err.to_string(), "404 models/foo is not found");
    }

    #[test]
    fn test_content_wire_shape() {
        let content = Content::model("hi");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json, serde_json::json!({"role": "model", "parts": [{"text": "hi"}]}));
    }
}
