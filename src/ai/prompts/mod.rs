//! Prompt template system for the suggestion tasks.
//!
//! Handlebars-based templates, one per suggestion operation. Each template
//! pairs a fixed system instruction (stating the output contract) with a
//! user message interpolating the task fields and any prior context
//! analysis. Rendering is deterministic and does no I/O.

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{SuggestError, SuggestResult};

mod analyze_context;
mod categorize_task;
mod enhance_description;
mod suggest_deadline;
mod suggest_priority;

pub use analyze_context::AnalyzeContextInput;
pub use categorize_task::CategorizeTaskInput;
pub use enhance_description::EnhanceDescriptionInput;
pub use suggest_deadline::SuggestDeadlineInput;
pub use suggest_priority::SuggestPriorityInput;

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID
    pub id: String,
    /// Description
    pub description: String,
    /// System prompt template
    pub system: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> SuggestResult<(String, String)> {
        let mut handlebars = create_handlebars();

        handlebars
            .register_template_string("system", &self.system)
            .map_err(|e| SuggestError::Prompt {
                reason: format!("invalid system template: {e}"),
            })?;
        handlebars
            .register_template_string("user", &self.user)
            .map_err(|e| SuggestError::Prompt {
                reason: format!("invalid user template: {e}"),
            })?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| SuggestError::Prompt {
                reason: format!("failed to render system prompt: {e}"),
            })?;
        let user = handlebars
            .render("user", context)
            .map_err(|e| SuggestError::Prompt {
                reason: format!("failed to render user prompt: {e}"),
            })?;

        Ok((system, user))
    }
}

/// Create a Handlebars instance with custom helpers.
fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    // Helper: {{{json value}}}
    handlebars.register_helper(
        "json",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                if let Some(param) = h.param(0) {
                    let json = serde_json::to_string_pretty(param.value())
                        .unwrap_or_else(|_| "null".to_string());
                    out.write(&json)?;
                }
                Ok(())
            },
        ),
    );

    handlebars
}

/// Registry of the five suggestion templates.
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Create a manager with all suggestion templates registered.
    pub fn new() -> Self {
        let mut manager = Self {
            templates: HashMap::new(),
        };

        manager.register(analyze_context::template());
        manager.register(suggest_priority::template());
        manager.register(suggest_deadline::template());
        manager.register(categorize_task::template());
        manager.register(enhance_description::template());

        manager
    }

    /// Register a template.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID.
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a template with context.
    pub fn render<T: Serialize>(&self, id: &str, context: &T) -> SuggestResult<(String, String)> {
        let template = self.get(id).ok_or_else(|| SuggestError::Prompt {
            reason: format!("template '{id}' not found"),
        })?;
        template.render(context)
    }

    /// List all template IDs.
    pub fn template_ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_rendering() {
        let template = PromptTemplate::new("test", "You are a {{role}}", "Task: {{title}}");
        let context = json!({ "role": "prioritizer", "title": "Fix bug" });

        let (system, user) = template.render(&context).unwrap();
        assert_eq!(system, "You are a prioritizer");
        assert_eq!(user, "Task: Fix bug");
    }

    #[test]
    fn test_json_helper() {
        let template = PromptTemplate::new("test", "System", "Analysis: {{{json analysis}}}");
        let context = json!({ "analysis": { "summary": "busy week", "themes": ["work"] } });

        let (_, user) = template.render(&context).unwrap();
        assert!(user.contains("\"summary\": \"busy week\""));
    }

    #[test]
    fn test_no_html_escaping() {
        let template = PromptTemplate::new("test", "s", "{{text}}");
        let context = json!({ "text": "a < b && c > d" });

        let (_, user) = template.render(&context).unwrap();
        assert_eq!(user, "a < b && c > d");
    }

    #[test]
    fn test_manager_registers_all_templates() {
        let manager = PromptManager::new();
        for id in [
            "analyze-context",
            "suggest-priority",
            "suggest-deadline",
            "categorize-task",
            "enhance-description",
        ] {
            assert!(manager.get(id).is_some(), "missing template {id}");
        }
        assert_eq!(manager.template_ids().len(), 5);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let manager = PromptManager::new();
        let input = SuggestPriorityInput {
            title: "Fix login".to_string(),
            description: "500s on submit".to_string(),
            priority: 50,
            deadline: "None".to_string(),
            context_analysis: json!({ "summary": "calm" }),
        };
        let a = manager.render("suggest-priority", &input).unwrap();
        let b = manager.render("suggest-priority", &input).unwrap();
        assert_eq!(a, b);
    }
}
