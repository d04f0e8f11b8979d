//! Core data structures for task suggestions.

mod context;
mod suggestion;
mod task;

pub use context::{ContextAnalysis, ContextEntry, ContextSource, MoodTone};
pub use suggestion::{
    CategorySuggestion, Suggested, SuggestionBundle, SuggestionSource, MAX_TAGS,
};
pub use task::{TaskDraft, PRIORITY_MAX, PRIORITY_MIN};
