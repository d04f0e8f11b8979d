//! Priority suggestion prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Input for the suggest-priority prompt.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestPriorityInput {
    pub title: String,
    pub description: String,
    /// Current priority in [0, 100]
    pub priority: i32,
    /// Current deadline, or "None"
    pub deadline: String,
    /// Serialized prior context analysis
    pub context_analysis: serde_json::Value,
}

/// Get the suggest-priority template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("suggest-priority", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Suggest a 0-100 priority score for a task")
}

const SYSTEM_PROMPT: &str = r"You are an AI assistant that helps prioritize tasks.
Based on the task details and context analysis, suggest a priority score from 0-100:
- 0-25: Low priority
- 26-50: Medium-Low priority
- 51-75: Medium-High priority
- 76-100: High priority

Consider factors like deadlines, urgency indicators from context, task complexity, and dependencies.
Return only the numeric priority score.";

const USER_PROMPT: &str = r"Task: {{title}}
Description: {{description}}
Current Priority: {{priority}}
Deadline: {{deadline}}

Context Analysis: {{{json context_analysis}}}

What priority score (0-100) would you assign?";
