//! Context analysis prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Input for the analyze-context prompt.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeContextInput {
    /// Entries rendered as one `[source] content` line each
    pub context_text: String,
}

/// Get the analyze-context template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("analyze-context", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Extract structured insight from daily context entries")
}

const SYSTEM_PROMPT: &str = r#"You are an AI assistant that analyzes daily context to help with task management.
Analyze the provided context and return a JSON response with:
- summary: Brief summary of the context
- key_themes: List of main themes/topics
- urgency_indicators: List of urgent items mentioned
- time_constraints: Any mentioned deadlines or time-sensitive items
- mood_tone: Overall mood/tone (positive, neutral, stressed)

Respond with valid JSON only."#;

const USER_PROMPT: &str = r"Analyze this daily context:

{{context_text}}";
