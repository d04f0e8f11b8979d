//! Description enhancement prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Input for the enhance-description prompt.
#[derive(Debug, Clone, Serialize)]
pub struct EnhanceDescriptionInput {
    pub title: String,
    pub description: String,
    /// Serialized prior context analysis
    pub context_analysis: serde_json::Value,
}

/// Get the enhance-description template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("enhance-description", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Rewrite a task description with context-aware detail")
}

const SYSTEM_PROMPT: &str = r"You are an AI assistant that enhances task descriptions.
Based on the original task and context analysis, provide an enhanced description that:
1. Clarifies the task objective
2. Adds relevant context from the analysis
3. Suggests potential steps or considerations
4. Keeps it concise but informative

Return only the enhanced description text.";

const USER_PROMPT: &str = r"Original Task: {{title}}
Original Description: {{description}}

Context Analysis: {{{json context_analysis}}}

Provide an enhanced description for this task.";
