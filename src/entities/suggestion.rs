//! Suggestion results and their provenance.

use serde::{Deserialize, Serialize};

/// Maximum number of tags a suggestion may carry.
pub const MAX_TAGS: usize = 5;

/// Whether a result came from the model or the heuristic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Model,
    Fallback,
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A single suggestion value tagged with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggested<T> {
    pub value: T,
    pub source: SuggestionSource,
}

impl<T> Suggested<T> {
    /// Wrap a value produced by the model path.
    pub fn model(value: T) -> Self {
        Self {
            value,
            source: SuggestionSource::Model,
        }
    }

    /// Wrap a value produced by the heuristic fallback.
    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: SuggestionSource::Fallback,
        }
    }

    /// Whether this suggestion came from the model.
    pub fn is_model(&self) -> bool {
        self.source == SuggestionSource::Model
    }
}

/// A suggested category plus up to [`MAX_TAGS`] tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: String,
    pub tags: Vec<String>,
}

impl CategorySuggestion {
    /// Create a suggestion, truncating tags to the allowed maximum.
    pub fn new(category: impl Into<String>, mut tags: Vec<String>) -> Self {
        tags.truncate(MAX_TAGS);
        Self {
            category: category.into(),
            tags,
        }
    }
}

/// The full set of derived fields returned for a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionBundle {
    /// Suggested priority in [0, 100]
    pub priority: i32,

    /// Suggested deadline as an ISO-8601 string, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    /// Suggested category
    pub category: String,

    /// Suggested tags (at most [`MAX_TAGS`])
    pub tags: Vec<String>,

    /// Enhanced task description
    #[serde(rename = "enhancedDescription")]
    pub enhanced_description: String,

    /// `model` only when every field above came from the model path
    pub source: SuggestionSource,
}
