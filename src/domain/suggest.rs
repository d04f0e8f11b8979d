//! Suggestion orchestrator.
//!
//! Composes prompt building, the model gateway, and the response
//! interpreter into the five public suggestion operations plus the
//! aggregate bundle. Backend failures never escape: every operation
//! degrades to the keyword heuristics and tags its result with a
//! provenance marker. The only error surfaced upward is invalid
//! caller-supplied input.

use serde::Serialize;
use tracing::{debug, warn};

use crate::ai::prompts::{
    AnalyzeContextInput, CategorizeTaskInput, EnhanceDescriptionInput, SuggestDeadlineInput,
    SuggestPriorityInput,
};
use crate::ai::{ChatMessage, GatewayHealth, ModelGateway, PromptManager};
use crate::entities::{
    CategorySuggestion, ContextAnalysis, ContextEntry, Suggested, SuggestionBundle,
    SuggestionSource, TaskDraft,
};
use crate::errors::SuggestResult;
use crate::{heuristics, interpret};

/// Orchestrates the five suggestion operations.
pub struct SuggestDomain {
    gateway: ModelGateway,
    prompts: PromptManager,
}

impl SuggestDomain {
    /// Create a domain around a gateway.
    pub fn new(gateway: ModelGateway) -> Self {
        Self {
            gateway,
            prompts: PromptManager::new(),
        }
    }

    /// Create a domain configured from the environment.
    pub fn from_env() -> Self {
        Self::new(ModelGateway::from_env())
    }

    /// Analyze context entries into structured insight.
    ///
    /// Empty input short-circuits to the fixed neutral analysis.
    pub async fn analyze_context(&self, entries: &[ContextEntry]) -> Suggested<ContextAnalysis> {
        if entries.is_empty() {
            return Suggested::fallback(heuristics::analyze_fallback(entries));
        }

        let context_text = entries
            .iter()
            .map(|e| format!("[{}] {}", e.source, e.content))
            .collect::<Vec<_>>()
            .join("\n");

        let input = AnalyzeContextInput { context_text };
        match self.run_prompt("analyze-context", &input).await {
            Ok(text) => Suggested::model(interpret::parse_context_analysis(&text)),
            Err(e) => {
                warn!(error = %e, "context analysis degraded to heuristics");
                Suggested::fallback(heuristics::analyze_fallback(entries))
            }
        }
    }

    /// Suggest a priority score in [0, 100].
    pub async fn suggest_priority(
        &self,
        task: &TaskDraft,
        analysis: &ContextAnalysis,
    ) -> SuggestResult<Suggested<i32>> {
        task.validate()?;

        let input = SuggestPriorityInput {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            deadline: deadline_label(task),
            context_analysis: to_value(analysis),
        };

        Ok(match self.run_prompt("suggest-priority", &input).await {
            Ok(text) => Suggested::model(interpret::parse_priority(&text, task)),
            Err(e) => {
                warn!(error = %e, "priority suggestion degraded to heuristics");
                Suggested::fallback(heuristics::priority_fallback(task))
            }
        })
    }

    /// Suggest a deadline as an ISO-8601 string, or nothing.
    pub async fn suggest_deadline(
        &self,
        task: &TaskDraft,
        analysis: &ContextAnalysis,
    ) -> SuggestResult<Suggested<Option<String>>> {
        task.validate()?;

        let input = SuggestDeadlineInput {
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: deadline_label(task),
            context_analysis: to_value(analysis),
        };

        Ok(match self.run_prompt("suggest-deadline", &input).await {
            Ok(text) => Suggested::model(interpret::parse_deadline(&text)),
            Err(e) => {
                warn!(error = %e, "deadline suggestion degraded, none offered");
                Suggested::fallback(None)
            }
        })
    }

    /// Suggest a category and up to five tags.
    pub async fn suggest_category_and_tags(
        &self,
        task: &TaskDraft,
        existing_categories: &[String],
    ) -> SuggestResult<Suggested<CategorySuggestion>> {
        task.validate()?;

        let input = CategorizeTaskInput {
            title: task.title.clone(),
            description: task.description.clone(),
            existing_categories: if existing_categories.is_empty() {
                "None".to_string()
            } else {
                existing_categories.join(", ")
            },
        };

        Ok(match self.run_prompt("categorize-task", &input).await {
            Ok(text) => Suggested::model(interpret::parse_category_tags(
                &text,
                task,
                existing_categories,
            )),
            Err(e) => {
                warn!(error = %e, "categorization degraded to heuristics");
                Suggested::fallback(heuristics::categorize_fallback(task, existing_categories))
            }
        })
    }

    /// Enhance a task description with context-aware detail.
    pub async fn enhance_description(
        &self,
        task: &TaskDraft,
        analysis: &ContextAnalysis,
    ) -> SuggestResult<Suggested<String>> {
        task.validate()?;

        let input = EnhanceDescriptionInput {
            title: task.title.clone(),
            description: task.description.clone(),
            context_analysis: to_value(analysis),
        };

        Ok(match self.run_prompt("enhance-description", &input).await {
            Ok(text) => Suggested::model(interpret::parse_enhancement(&text)),
            Err(e) => {
                warn!(error = %e, "description enhancement degraded to heuristics");
                Suggested::fallback(heuristics::enhance_fallback(task))
            }
        })
    }

    /// Produce the full suggestion bundle for a task.
    ///
    /// Context is analyzed once and shared across the field operations.
    /// The bundle's `source` is `model` only when every field (and the
    /// analysis) came from the model path.
    pub async fn suggest_all(
        &self,
        task: &TaskDraft,
        entries: &[ContextEntry],
        existing_categories: &[String],
    ) -> SuggestResult<SuggestionBundle> {
        task.validate()?;

        let analysis = self.analyze_context(entries).await;
        let priority = self.suggest_priority(task, &analysis.value).await?;
        let deadline = self.suggest_deadline(task, &analysis.value).await?;
        let category = self
            .suggest_category_and_tags(task, existing_categories)
            .await?;
        let description = self.enhance_description(task, &analysis.value).await?;

        let all_model = analysis.is_model()
            && priority.is_model()
            && deadline.is_model()
            && category.is_model()
            && description.is_model();

        Ok(SuggestionBundle {
            priority: priority.value,
            deadline: deadline.value,
            category: category.value.category,
            tags: category.value.tags,
            enhanced_description: description.value,
            source: if all_model {
                SuggestionSource::Model
            } else {
                SuggestionSource::Fallback
            },
        })
    }

    /// Probe backend health with a trivial message.
    pub async fn health(&self) -> GatewayHealth {
        self.gateway.probe().await
    }

    /// Render a template and send it through the gateway.
    async fn run_prompt<T: Serialize>(&self, template: &str, input: &T) -> SuggestResult<String> {
        let (system, user) = self.prompts.render(template, input)?;
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        debug!(template, "sending suggestion request");
        self.gateway.request(&messages).await
    }
}

/// Task deadline rendered for prompt interpolation.
fn deadline_label(task: &TaskDraft) -> String {
    task.deadline
        .map_or_else(|| "None".to_string(), |d| d.to_rfc3339())
}

/// Serialize an analysis for prompt embedding; an analysis always
/// serializes, so failure collapses to null.
fn to_value(analysis: &ContextAnalysis) -> serde_json::Value {
    serde_json::to_value(analysis).unwrap_or(serde_json::Value::Null)
}
