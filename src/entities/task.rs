//! Task draft read by the suggestion core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{SuggestError, SuggestResult};

/// Minimum allowed priority.
pub const PRIORITY_MIN: i32 = 0;
/// Maximum allowed priority.
pub const PRIORITY_MAX: i32 = 100;

/// A task as seen by the suggestion core.
///
/// The core only reads these fields and returns suggestions; applying a
/// suggestion back to the task store is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Brief, descriptive title
    pub title: String,

    /// Free-text description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Priority score in [0, 100]
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Optional deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

fn default_priority() -> i32 {
    50
}

impl TaskDraft {
    /// Create a draft with a medium priority and no deadline.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: default_priority(),
            deadline: None,
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the deadline.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Title and description joined and lower-cased for keyword scans.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// Validate caller-supplied input.
    ///
    /// This is the only failure a suggestion operation surfaces upward.
    pub fn validate(&self) -> SuggestResult<()> {
        if self.title.trim().is_empty() {
            return Err(SuggestError::InvalidInput {
                reason: "task title must not be empty".to_string(),
            });
        }
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&self.priority) {
            return Err(SuggestError::InvalidInput {
                reason: format!(
                    "priority {} out of range [{PRIORITY_MIN}, {PRIORITY_MAX}]",
                    self.priority
                ),
            });
        }
        Ok(())
    }
}
