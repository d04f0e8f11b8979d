//! Hosted backend: OpenAI chat completions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{BackendKind, SuggestError, SuggestResult};

use super::provider::{ChatBackend, ChatMessage, ChatRole, GenerateOptions};

/// OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// OpenAI API request message
#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI API response choice message
#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    content: Option<String>,
}

/// OpenAI API response choice
#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

/// OpenAI API error
#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

/// Hosted OpenAI backend.
pub struct OpenAIBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAIBackend {
    /// Create a new backend with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            api_key: Some(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    ///
    /// A missing key yields an unconfigured backend, not an error.
    pub fn from_env() -> Self {
        Self {
            client: http_client(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint URL (Azure, proxies, test doubles).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAIMessage> {
        messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    ChatRole::System => "system".to_string(),
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl ChatBackend for OpenAIBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hosted
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> SuggestResult<String> {
        let api_key = self.api_key.as_ref().ok_or(SuggestError::NotConfigured {
            backend: BackendKind::Hosted,
        })?;

        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport_error(BackendKind::Hosted, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(BackendKind::Hosted, &e))?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SuggestError::RateLimited);
        }

        if !status.is_success() {
            let reason = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(SuggestError::BackendUnreachable {
                backend: BackendKind::Hosted,
                reason: format!("HTTP {status}: {reason}"),
            });
        }

        let api_response: OpenAIResponse =
            serde_json::from_str(&body).map_err(|e| SuggestError::ResponseParse {
                reason: format!("malformed completion payload: {e}"),
            })?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SuggestError::ResponseParse {
                reason: "completion contained no choices".to_string(),
            })
    }
}

/// Map a reqwest transport error onto the gateway taxonomy.
pub(crate) fn classify_transport_error(backend: BackendKind, err: &reqwest::Error) -> SuggestError {
    if err.is_timeout() {
        SuggestError::Timeout { backend }
    } else {
        SuggestError::BackendUnreachable {
            backend,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_without_key() {
        let backend = OpenAIBackend {
            client: http_client(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_URL.to_string(),
        };
        assert!(!backend.is_configured());
        assert_eq!(backend.kind(), BackendKind::Hosted);
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            ChatMessage::system("You are a helpful assistant"),
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there!"),
        ];

        let converted = OpenAIBackend::convert_messages(&messages);

        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
        assert_eq!(converted[2].role, "assistant");
    }

    #[tokio::test]
    async fn test_complete_without_key_is_not_configured() {
        let backend = OpenAIBackend {
            client: http_client(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_URL.to_string(),
        };
        let err = backend
            .complete(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SuggestError::NotConfigured {
                backend: BackendKind::Hosted
            }
        ));
    }
}
