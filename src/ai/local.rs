//! Local backend: an OpenAI-compatible endpoint such as LM Studio or
//! Ollama, addressed by URL with no credential.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{BackendKind, SuggestError, SuggestResult};

use super::openai::classify_transport_error;
use super::provider::{ChatBackend, ChatMessage, ChatRole, GenerateOptions};

/// Per-request timeout. Local inference is slower than the hosted API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Local completion request (OpenAI wire format, no model field required)
#[derive(Debug, Serialize)]
struct LocalRequest {
    messages: Vec<LocalMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct LocalMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct LocalChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalChoice {
    message: LocalChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct LocalResponse {
    choices: Vec<LocalChoice>,
}

/// Locally hosted chat backend.
pub struct LocalBackend {
    client: Client,
    url: Option<String>,
}

impl LocalBackend {
    /// Create a backend pointed at a completion URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            url: Some(url.into()),
        }
    }

    /// Create from the `LOCAL_LLM_URL` environment variable.
    ///
    /// A missing URL yields an unconfigured backend, not an error.
    pub fn from_env() -> Self {
        Self {
            client: http_client(),
            url: std::env::var("LOCAL_LLM_URL").ok().filter(|u| !u.is_empty()),
        }
    }

    /// An explicitly unconfigured backend.
    pub fn unconfigured() -> Self {
        Self {
            client: http_client(),
            url: None,
        }
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<LocalMessage> {
        messages
            .iter()
            .map(|msg| LocalMessage {
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
impl ChatBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> SuggestResult<String> {
        let url = self.url.as_ref().ok_or(SuggestError::NotConfigured {
            backend: BackendKind::Local,
        })?;

        let request = LocalRequest {
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport_error(BackendKind::Local, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(BackendKind::Local, &e))?;

        if !status.is_success() {
            return Err(SuggestError::BackendUnreachable {
                backend: BackendKind::Local,
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let api_response: LocalResponse =
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_backend() {
        let backend = LocalBackend::unconfigured();
        assert!(!backend.is_configured());
        assert_eq!(backend.kind(), BackendKind::Local);
    }

    #[tokio::test]
    async fn test_complete_without_url_is_not_configured() {
        let backend = LocalBackend::unconfigured();
        let err = backend
            .complete(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SuggestError::NotConfigured {
                backend: BackendKind::Local
            }
        ));
    }

    #[test]
    fn test_configured_with_url() {
        let backend = LocalBackend::new("http://localhost:1234/v1/chat/completions");
        assert!(backend.is_configured());
    }
}
