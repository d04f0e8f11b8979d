//! Deadline suggestion prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Input for the suggest-deadline prompt.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestDeadlineInput {
    pub title: String,
    pub description: String,
    /// Current deadline, or "None"
    pub deadline: String,
    /// Serialized prior context analysis
    pub context_analysis: serde_json::Value,
}

/// Get the suggest-deadline template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("suggest-deadline", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Suggest a realistic ISO-8601 deadline for a task")
}

const SYSTEM_PROMPT: &str = r#"You are an AI assistant that suggests realistic deadlines for tasks.
Based on the task details and context, suggest a deadline in ISO format (YYYY-MM-DDTHH:MM:SS).
Consider task complexity, current workload indicators from context, and any mentioned time constraints.
If no specific deadline can be determined, return "flexible"."#;

const USER_PROMPT: &str = r"Task: {{title}}
Description: {{description}}
Current Deadline: {{deadline}}

Context Analysis: {{{json context_analysis}}}

What would be a realistic deadline for this task?";
