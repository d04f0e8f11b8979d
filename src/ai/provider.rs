//! Chat backend trait and message types.
//!
//! Defines the logical contract both backends share: an ordered list of
//! role-tagged messages in, a single text completion out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{BackendKind, SuggestResult};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Sets context/behavior
    System,
    /// Input
    User,
    /// Model response
    Assistant,
}

/// A message in a conversation with a chat model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
            max_tokens: Some(1000),
        }
    }
}

/// Trait for chat-completion backends.
///
/// Both the hosted API and the local endpoint implement this; the gateway
/// treats them interchangeably, and tests inject scripted stubs.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Which backend slot this implementation fills.
    fn kind(&self) -> BackendKind;

    /// Whether the backend has everything it needs (credential/URL).
    fn is_configured(&self) -> bool;

    /// Send messages and return the raw text completion.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> SuggestResult<String>;
}

/// Strip a markdown code fence wrapping from model output, if present.
///
/// Models frequently wrap JSON in ```json blocks even when asked not to.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix("```json") {
        return inner.strip_suffix("```").unwrap_or(inner).trim();
    }
    if let Some(inner) = text.strip_prefix("```") {
        return inner.strip_suffix("```").unwrap_or(inner).trim();
    }
    text
}
