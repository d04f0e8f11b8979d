//! Error types for the tasksage crate.

use thiserror::Error;

/// Which model backend an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted chat-completion API (requires credential)
    Hosted,
    /// Locally hosted endpoint (LM Studio, Ollama, ...)
    Local,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hosted => write!(f, "hosted"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Error taxonomy for suggestion operations.
///
/// Backend failures never escape the `SuggestDomain`; every public
/// suggestion operation degrades to the keyword heuristics instead.
/// The only variant a caller of the domain can observe is `InvalidInput`.
#[derive(Error, Debug, Clone)]
pub enum SuggestError {
    #[error("Rate limit exceeded, backend cooling down")]
    RateLimited,

    #[error("Request to {backend} backend timed out")]
    Timeout { backend: BackendKind },

    #[error("{backend} backend unreachable: {reason}")]
    BackendUnreachable {
        backend: BackendKind,
        reason: String,
    },

    #[error("{backend} backend not configured")]
    NotConfigured { backend: BackendKind },

    #[error("No AI backend configured. Set OPENAI_API_KEY or LOCAL_LLM_URL")]
    NoBackendConfigured,

    #[error("Failed to parse model response: {reason}")]
    ResponseParse { reason: String },

    #[error("Prompt rendering failed: {reason}")]
    Prompt { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl SuggestError {
    /// Whether the gateway retry loop may re-attempt after this error.
    ///
    /// Rate limits and configuration problems are terminal: retrying them
    /// either worsens the limit or can never succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::BackendUnreachable { .. }
        )
    }

    /// Whether this error is a rate-limit signal.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Result type alias for suggestion operations.
pub type SuggestResult<T> = Result<T, SuggestError>;
