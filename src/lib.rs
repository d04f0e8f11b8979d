#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::map_unwrap_or)]

//! # Tasksage
//!
//! AI-assisted suggestions for task management backends.
//!
//! This crate turns free-text context entries (emails, notes, meetings)
//! and task drafts into structured suggestions: priority, deadline,
//! category/tags, and an enhanced description. Suggestions come from a
//! chat-completion backend (hosted API or local endpoint) with retry and
//! cross-backend fallback; when no backend is usable the deterministic
//! keyword heuristics take over, and every result carries a provenance
//! marker saying which path produced it.
//!
//! Storage, HTTP routing, and auth are the caller's concern; this crate
//! only reads task data and returns suggestions.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tasksage::{ContextEntry, ContextSource, SuggestDomain, TaskDraft};
//!
//! let domain = SuggestDomain::from_env();
//! let task = TaskDraft::new("Urgent client meeting", "");
//! let entries = vec![ContextEntry::new("deadline friday", ContextSource::Email)];
//!
//! let bundle = domain.suggest_all(&task, &entries, &[]).await?;
//! println!("{} ({})", bundle.priority, bundle.source);
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Configuration
pub mod config;

// Keyword heuristics (deterministic fallback path)
pub mod heuristics;

// AI integration: backends, gateway, prompts
pub mod ai;

// Free-text response interpretation
pub mod interpret;

// Domain facades
pub mod domain;

// Re-export key types for convenience
pub use ai::{
    ChatBackend, ChatMessage, ChatRole, GatewayHealth, GenerateOptions, LocalBackend,
    ModelGateway, OpenAIBackend, PromptManager, PromptTemplate, RetryPolicy,
};
pub use config::SuggestConfig;
pub use domain::SuggestDomain;
pub use entities::{
    CategorySuggestion, ContextAnalysis, ContextEntry, ContextSource, MoodTone, Suggested,
    SuggestionBundle, SuggestionSource, TaskDraft, MAX_TAGS,
};
pub use errors::{BackendKind, SuggestError, SuggestResult};
