//! Category and tag suggestion prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Input for the categorize-task prompt.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizeTaskInput {
    pub title: String,
    pub description: String,
    /// Comma-joined existing category names, or "None"
    pub existing_categories: String,
}

/// Get the categorize-task template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("categorize-task", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Suggest a category and up to 5 tags for a task")
}

const SYSTEM_PROMPT: &str = r#"You are an AI assistant that categorizes tasks and suggests tags.
Based on the task details, suggest:
1. A category from existing ones or propose a new one
2. Up to 5 relevant tags

Existing categories: {{existing_categories}}

Return response as JSON with "category" and "tags" fields."#;

const USER_PROMPT: &str = r"Task: {{title}}
Description: {{description}}

Suggest category and tags for this task.";
