use crate::env;
use crate::llm::provider::ModelBackend;
use crate::llm::types::{ApiKey, Content, LLMError, ModelHandle};
use futures::future::BoxFuture;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Connection settings for the Generative Language REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_version: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: env::gemini::DEFAULT_BASE_URL.to_string(),
            api_version: env::gemini::DEFAULT_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    details: Vec<ApiErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorInfo {
    reason: Option<String>,
}

/// Gemini backend over plain HTTPS.
///
/// Model "initialization" is a `models.get` lookup, so an identifier that
/// was retired or is not enabled for the key fails here and the caller
/// can fall back before sending any message.
pub struct GeminiProvider {
    http: Client,
    base_url: Url,
    api_version: String,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, LLMError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| LLMError::Network(format!("invalid base url '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(LLMError::Network(format!(
                "invalid base url '{}': cannot be a base",
                config.base_url
            )));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            api_version: config.api_version,
        })
    }

    /// Accepts both `gemini-2.0-flash` and `models/gemini-2.0-flash`.
    fn normalize_model(model: &str) -> Result<&str, LLMError> {
        let name = model.trim().trim_start_matches("models/");
        let valid = name.chars().any(|c| c.is_ascii_alphanumeric())
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
        if valid {
            Ok(name)
        } else {
            Err(LLMError::InvalidModel(model.to_string()))
        }
    }

    fn endpoint(&self, last_segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.api_version)
                .push("models")
                .push(last_segment);
        }
        url
    }

    /// Turn a non-success response into an `LLMError::Api`, pulling the
    /// message and reason code out of the standard Google error body.
    async fn api_error(response: Response) -> LLMError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(parsed) => LLMError::Api {
                status,
                message: parsed.error.message,
                reason: parsed.error.details.into_iter().find_map(|d| d.reason),
            },
            Err(_) => {
                let mut message: String = body.chars().take(500).collect();
                if message.trim().is_empty() {
                    message = "empty error response".to_string();
                }
                LLMError::Api {
                    status,
                    message,
                    reason: None,
                }
            }
        }
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String, LLMError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            Err(LLMError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

impl ModelBackend for GeminiProvider {
    fn open_model<'a>(
        &'a self,
        model: &'a str,
        api_key: &'a ApiKey,
    ) -> BoxFuture<'a, Result<ModelHandle, LLMError>> {
        Box::pin(async move {
            let name = Self::normalize_model(model)?;
            let url = self.endpoint(name);
            debug!("Probing model availability: {}", url);

            let response = self
                .http
                .get(url)
                .header(env::gemini::API_KEY_HEADER, api_key.expose())
                .send()
                .await
                .map_err(|e| LLMError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }

            Ok(ModelHandle {
                name: name.to_string(),
            })
        })
    }

    fn generate<'a>(
        &'a self,
        model: &'a ModelHandle,
        api_key: &'a ApiKey,
        contents: Vec<Content>,
    ) -> BoxFuture<'a, Result<String, LLMError>> {
        Box::pin(async move {
            let url = self.endpoint(&format!("{}:generateContent", model.name));
            debug!("Sending {} content entries to {}", contents.len(), model.name);

            let response = self
                .http
                .post(url)
                .header(env::gemini::API_KEY_HEADER, api_key.expose())
                .json(&GenerateContentRequest {
                    contents: &contents,
                })
                .send()
                .await
                .map_err(|e| LLMError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }

            let parsed: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| LLMError::Serialization(e.to_string()))?;

            Self::extract_text(parsed)
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> GeminiProvider {
        GeminiProvider::new(GeminiConfig {
            base_url: base.to_string(),
            api_version: "v1beta".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_construction() {
        let p = provider("https://generativelanguage.googleapis.com");
        assert_eq!(
            p.endpoint("gemini-2.0-flash:generateContent").as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );

        let p = provider("http://localhost:8080/proxy/");
        assert_eq!(
            p.endpoint("gemini-pro-latest").as_str(),
            "http://localhost:8080/proxy/v1beta/models/gemini-pro-latest"
        );
    }

    #[test]
    fn test_normalize_model() {
        assert_eq!(
            GeminiProvider::normalize_model("models/gemini-2.0-flash").unwrap(),
            "gemini-2.0-flash"
        );
        assert!(GeminiProvider::normalize_model("").is_err());
        assert!(GeminiProvider::normalize_model("../etc").is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GeminiProvider::new(GeminiConfig {
            base_url: "not a url".to_string(),
            api_version: "v1beta".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hel"}, {"text": "lo"}]}}]
        }))
        .unwrap();
        assert_eq!(GeminiProvider::extract_text(response).unwrap(), "Hello");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(
            GeminiProvider::extract_text(response),
            Err(LLMError::EmptyResponse)
        ));
    }
}
