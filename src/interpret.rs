//! Response interpreter: best-effort structured extraction from free-text
//! model output.
//!
//! Each parser documents its fallback order and is total; failures step
//! down to a cruder extraction or to the heuristics engine, never upward.

use regex::Regex;
use serde::Deserialize;

use crate::ai::strip_code_fences;
use crate::entities::{
    CategorySuggestion, ContextAnalysis, MoodTone, TaskDraft, MAX_TAGS, PRIORITY_MAX, PRIORITY_MIN,
};
use crate::heuristics;

/// Default time appended to bare-date deadlines (5 PM).
const DEFAULT_DEADLINE_TIME: &str = "17:00:00";

/// Loosely-shaped analysis payload as models actually produce it.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_themes: Vec<String>,
    #[serde(default)]
    urgency_indicators: Vec<String>,
    #[serde(default)]
    time_constraints: Vec<String>,
    #[serde(default)]
    mood_tone: String,
}

/// Loosely-shaped category payload.
#[derive(Debug, Deserialize)]
struct RawCategorization {
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse a context-analysis response.
///
/// Fallback order: strict JSON parse; else wrap the raw text into the
/// summary with empty lists and neutral mood. Never fails.
pub fn parse_context_analysis(text: &str) -> ContextAnalysis {
    let stripped = strip_code_fences(text);
    match serde_json::from_str::<RawAnalysis>(stripped) {
        Ok(raw) => ContextAnalysis {
            summary: raw.summary,
            key_themes: raw.key_themes,
            urgency_indicators: raw.urgency_indicators,
            time_constraints: raw.time_constraints,
            mood_tone: MoodTone::parse_lenient(&raw.mood_tone),
        },
        Err(_) => ContextAnalysis {
            summary: text.trim().to_string(),
            key_themes: Vec::new(),
            urgency_indicators: Vec::new(),
            time_constraints: Vec::new(),
            mood_tone: MoodTone::Neutral,
        },
    }
}

/// Parse a priority response.
///
/// Fallback order: first integer substring clamped to [0, 100]; else the
/// heuristic priority for the task.
pub fn parse_priority(text: &str, task: &TaskDraft) -> i32 {
    let re = Regex::new(r"\d+").unwrap();
    re.find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(|n| n.clamp(i64::from(PRIORITY_MIN), i64::from(PRIORITY_MAX)) as i32)
        .unwrap_or_else(|| heuristics::priority_fallback(task))
}

/// Parse a deadline response.
///
/// Fallback order: a "flexible"/"no deadline" token means no deadline; else
/// the first full ISO-8601 date-time verbatim; else the first bare date with
/// 17:00:00 appended; else nothing.
pub fn parse_deadline(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if lower.contains("flexible") || lower.contains("no deadline") {
        return None;
    }

    let datetime_re = Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").unwrap();
    if let Some(m) = datetime_re.find(text) {
        return Some(m.as_str().to_string());
    }

    let date_re = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
    date_re
        .find(text)
        .map(|m| format!("{}T{DEFAULT_DEADLINE_TIME}", m.as_str()))
}

/// Parse a category/tags response.
///
/// Fallback order: strict JSON parse of `category` and `tags`; else
/// line-oriented extraction (lines containing "category" or "tag" split on
/// the last colon); else the heuristic categorization. Tags always
/// truncated to five.
pub fn parse_category_tags(
    text: &str,
    task: &TaskDraft,
    existing_categories: &[String],
) -> CategorySuggestion {
    let stripped = strip_code_fences(text);
    if let Ok(raw) = serde_json::from_str::<RawCategorization>(stripped) {
        if !raw.category.is_empty() || !raw.tags.is_empty() {
            return CategorySuggestion::new(raw.category, raw.tags);
        }
    }

    let mut category = String::new();
    let mut tags: Vec<String> = Vec::new();
    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.contains("category") {
            if let Some((_, value)) = line.rsplit_once(':') {
                category = value.trim().to_string();
            }
        } else if lower.contains("tag") {
            if let Some((_, value)) = line.rsplit_once(':') {
                tags.extend(
                    value
                        .split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty()),
                );
            }
        }
    }
    tags.truncate(MAX_TAGS);

    if category.is_empty() && tags.is_empty() {
        return heuristics::categorize_fallback(task, existing_categories);
    }
    CategorySuggestion::new(category, tags)
}

/// Parse an enhanced-description response: the trimmed text as-is.
pub fn parse_enhancement(text: &str) -> String {
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskDraft {
        TaskDraft::new("Urgent client meeting", "")
    }

    #[test]
    fn test_analysis_strict_json() {
        let response = r#"{"summary": "busy week", "key_themes": ["work"],
            "urgency_indicators": ["deadline"], "time_constraints": ["friday"],
            "mood_tone": "stressed"}"#;
        let analysis = parse_context_analysis(response);
        assert_eq!(analysis.summary, "busy week");
        assert_eq!(analysis.key_themes, vec!["work"]);
        assert_eq!(analysis.mood_tone, MoodTone::Stressed);
    }

    #[test]
    fn test_analysis_fenced_json() {
        let response = "```json\n{\"summary\": \"ok\", \"mood_tone\": \"positive\"}\n```";
        let analysis = parse_context_analysis(response);
        assert_eq!(analysis.summary, "ok");
        assert_eq!(analysis.mood_tone, MoodTone::Positive);
    }

    #[test]
    fn test_analysis_unparseable_wraps_text() {
        let analysis = parse_context_analysis("The week looks calm overall.");
        assert_eq!(analysis.summary, "The week looks calm overall.");
        assert!(analysis.key_themes.is_empty());
        assert_eq!(analysis.mood_tone, MoodTone::Neutral);
    }

    #[test]
    fn test_priority_extracts_first_integer() {
        assert_eq!(parse_priority("I would assign 85 out of 100.", &task()), 85);
        assert_eq!(parse_priority("75", &task()), 75);
    }

    #[test]
    fn test_priority_clamps() {
        assert_eq!(parse_priority("Priority: 250", &task()), 100);
        assert_eq!(parse_priority("0", &task()), 0);
    }

    #[test]
    fn test_priority_defers_to_heuristics() {
        // "Urgent client meeting" bumps the default 50 to 75.
        assert_eq!(parse_priority("no number here", &task()), 75);
    }

    #[test]
    fn test_deadline_flexible_means_none() {
        assert!(parse_deadline("This one is Flexible.").is_none());
        assert!(parse_deadline("FLEXIBLE").is_none());
        assert!(parse_deadline("There is no deadline needed").is_none());
    }

    #[test]
    fn test_deadline_full_datetime_verbatim() {
        assert_eq!(
            parse_deadline("I suggest 2025-03-01T09:00:00 as the deadline."),
            Some("2025-03-01T09:00:00".to_string())
        );
    }

    #[test]
    fn test_deadline_bare_date_gets_default_time() {
        assert_eq!(
            parse_deadline("By 2025-03-01 would be realistic."),
            Some("2025-03-01T17:00:00".to_string())
        );
    }

    #[test]
    fn test_deadline_nothing_found() {
        assert!(parse_deadline("sometime next week").is_none());
    }

    #[test]
    fn test_category_strict_json() {
        let response = r#"{"category": "Work", "tags": ["meeting", "client"]}"#;
        let suggestion = parse_category_tags(response, &task(), &[]);
        assert_eq!(suggestion.category, "Work");
        assert_eq!(suggestion.tags, vec!["meeting", "client"]);
    }

    #[test]
    fn test_category_json_truncates_tags() {
        let response = r#"{"category": "Work",
            "tags": ["a", "b", "c", "d", "e", "f", "g"]}"#;
        let suggestion = parse_category_tags(response, &task(), &[]);
        assert_eq!(suggestion.tags.len(), 5);
    }

    #[test]
    fn test_category_line_oriented_fallback() {
        let response = "Category: Work\nTags: meeting, urgent, client";
        let suggestion = parse_category_tags(response, &task(), &[]);
        assert_eq!(suggestion.category, "Work");
        assert_eq!(suggestion.tags, vec!["meeting", "urgent", "client"]);
    }

    #[test]
    fn test_category_defers_to_heuristics() {
        let suggestion = parse_category_tags("I cannot help with that.", &task(), &[]);
        assert_eq!(suggestion.category, "Work");
        assert!(suggestion.tags.contains(&"meeting".to_string()));
    }

    #[test]
    fn test_enhancement_trims() {
        assert_eq!(parse_enhancement("  polished text \n"), "polished text");
    }
}
