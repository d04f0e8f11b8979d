//! Keyword heuristics engine.
//!
//! Deterministic fallback logic used when the model backend is
//! unavailable, rate-limited, or returns unparseable output. Every
//! function here is pure and total: no I/O, no failure mode.

use crate::entities::{
    CategorySuggestion, ContextAnalysis, ContextEntry, MoodTone, TaskDraft, PRIORITY_MAX,
    PRIORITY_MIN,
};

/// Urgency keywords scanned in context text.
const URGENCY_KEYWORDS: &[&str] = &["urgent", "asap", "critical", "emergency", "deadline", "due"];

/// Theme buckets scanned in context text.
const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    ("work", &["work", "project", "meeting", "business", "office"]),
    ("personal", &["personal", "family", "home", "health"]),
    ("learning", &["learn", "study", "course", "training"]),
    ("finance", &["money", "pay", "bill", "budget", "bank"]),
];

const POSITIVE_WORDS: &[&str] = &["good", "great", "excellent", "happy", "success"];
const NEGATIVE_WORDS: &[&str] = &["bad", "terrible", "stressed", "worried", "problem"];

/// Keywords that push a task's priority up.
const HIGH_PRIORITY_KEYWORDS: &[&str] =
    &["urgent", "asap", "critical", "important", "deadline", "meeting"];

/// Keywords that push a task's priority down.
const LOW_PRIORITY_KEYWORDS: &[&str] =
    &["later", "someday", "maybe", "optional", "nice to have"];

/// How far a keyword match shifts the current priority.
const PRIORITY_DELTA: i32 = 25;

/// Category keyword sets, scored by substring-match count in table order.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Work", &["work", "project", "meeting", "deadline", "task", "business"]),
    ("Personal", &["personal", "home", "family", "health", "exercise"]),
    ("Learning", &["learn", "study", "course", "training", "education"]),
    ("Shopping", &["buy", "purchase", "shop", "order", "grocery"]),
    ("Health", &["doctor", "appointment", "medicine", "exercise", "health"]),
    ("Finance", &["pay", "bill", "money", "budget", "bank", "finance"]),
];

/// Category used when no keyword set matches.
const DEFAULT_CATEGORY: &str = "General";

/// Analyze context entries without the model.
///
/// Empty input yields the fixed neutral analysis. Otherwise all entry
/// content is lower-cased and scanned against the static keyword tables.
pub fn analyze_fallback(entries: &[ContextEntry]) -> ContextAnalysis {
    if entries.is_empty() {
        return ContextAnalysis::neutral();
    }

    let all_text = entries
        .iter()
        .map(|e| e.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let urgency_indicators: Vec<String> = URGENCY_KEYWORDS
        .iter()
        .filter(|kw| all_text.contains(*kw))
        .map(|kw| (*kw).to_string())
        .collect();

    let key_themes: Vec<String> = THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| all_text.contains(kw)))
        .map(|(theme, _)| (*theme).to_string())
        .collect();

    let positive = POSITIVE_WORDS.iter().filter(|w| all_text.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| all_text.contains(*w)).count();
    let mood_tone = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => MoodTone::Positive,
        std::cmp::Ordering::Less => MoodTone::Stressed,
        std::cmp::Ordering::Equal => MoodTone::Neutral,
    };

    let themes_label = if key_themes.is_empty() {
        "general".to_string()
    } else {
        key_themes.join(", ")
    };

    ContextAnalysis {
        summary: format!(
            "Analyzed {} context entries with themes: {}",
            entries.len(),
            themes_label
        ),
        key_themes,
        urgency_indicators,
        time_constraints: Vec::new(),
        mood_tone,
    }
}

/// Suggest a priority without the model.
///
/// Shifts the current priority by 25 on a high- or low-urgency keyword
/// match, clamped to [0, 100]. When both lists match, the current value
/// wins unchanged.
pub fn priority_fallback(task: &TaskDraft) -> i32 {
    let text = task.searchable_text();

    let has_high = HIGH_PRIORITY_KEYWORDS.iter().any(|kw| text.contains(kw));
    let has_low = LOW_PRIORITY_KEYWORDS.iter().any(|kw| text.contains(kw));

    let priority = match (has_high, has_low) {
        (true, false) => task.priority + PRIORITY_DELTA,
        (false, true) => task.priority - PRIORITY_DELTA,
        _ => task.priority,
    };

    priority.clamp(PRIORITY_MIN, PRIORITY_MAX)
}

/// Suggest a category and tags without the model.
///
/// Categories are scored by keyword-match count over title + description;
/// the first maximum in table order wins. If the winner is not already a
/// known category and some categories exist, the first existing category
/// is used instead. Zero matches yield `General`.
pub fn categorize_fallback(task: &TaskDraft, existing_categories: &[String]) -> CategorySuggestion {
    let text = task.searchable_text();

    let mut best_category = DEFAULT_CATEGORY;
    let mut max_matches = 0usize;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let matches = keywords.iter().filter(|kw| text.contains(*kw)).count();
        if matches > max_matches {
            max_matches = matches;
            best_category = category;
        }
    }

    let category = if existing_categories.iter().any(|c| c == best_category) {
        best_category.to_string()
    } else if let Some(first) = existing_categories.first() {
        first.clone()
    } else {
        best_category.to_string()
    };

    let mut tags = Vec::new();
    if text.contains("meeting") {
        tags.push("meeting".to_string());
    }
    if text.contains("urgent") || text.contains("asap") {
        tags.push("urgent".to_string());
    }
    if text.contains("project") {
        tags.push("project".to_string());
    }
    if text.contains("review") {
        tags.push("review".to_string());
    }
    if text.contains("plan") {
        tags.push("planning".to_string());
    }

    CategorySuggestion::new(category, tags)
}

/// Enhance a task description without the model.
///
/// A non-empty description is returned unchanged; otherwise a templated
/// sentence is synthesized from the title.
pub fn enhance_fallback(task: &TaskDraft) -> String {
    if !task.description.trim().is_empty() {
        return task.description.clone();
    }

    let title = task.title.as_str();
    let title_lower = task.title.to_lowercase();

    if title_lower.contains("meeting") {
        format!(
            "Organize and conduct {title}. Prepare agenda, invite participants, \
             and ensure all necessary materials are ready."
        )
    } else if title_lower.contains("plan") {
        format!(
            "Create a comprehensive plan for {}. Define objectives, timeline, \
             and required resources.",
            strip_keyword(title, "plan")
        )
    } else if title_lower.contains("review") {
        format!(
            "Conduct thorough review of {}. Analyze current status and identify \
             areas for improvement.",
            strip_keyword(title, "review")
        )
    } else if title_lower.contains("project") {
        format!(
            "Work on {title}. Break down into smaller tasks and track progress \
             towards completion."
        )
    } else {
        format!("Complete {title}. Ensure all requirements are met and deliverables are ready.")
    }
}

/// Remove the first case-insensitive occurrence of `keyword` from `title`.
fn strip_keyword(title: &str, keyword: &str) -> String {
    let lower = title.to_lowercase();
    match lower.find(keyword) {
        Some(idx) => {
            let mut stripped = String::with_capacity(title.len());
            stripped.push_str(&title[..idx]);
            stripped.push_str(&title[idx + keyword.len()..]);
            stripped.trim().to_string()
        }
        None => title.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContextSource;

    fn entry(content: &str) -> ContextEntry {
        ContextEntry::new(content, ContextSource::Note)
    }

    #[test]
    fn test_analyze_empty_entries() {
        let analysis = analyze_fallback(&[]);
        assert_eq!(analysis.summary, "No context available");
        assert!(analysis.key_themes.is_empty());
        assert!(analysis.urgency_indicators.is_empty());
        assert_eq!(analysis.mood_tone, MoodTone::Neutral);
    }

    #[test]
    fn test_analyze_detects_urgency_and_themes() {
        let entries = vec![
            entry("Urgent: project deadline moved to Friday"),
            entry("Pay the electricity bill"),
        ];
        let analysis = analyze_fallback(&entries);
        assert!(analysis.urgency_indicators.contains(&"urgent".to_string()));
        assert!(analysis.urgency_indicators.contains(&"deadline".to_string()));
        assert!(analysis.key_themes.contains(&"work".to_string()));
        assert!(analysis.key_themes.contains(&"finance".to_string()));
        assert!(analysis.summary.starts_with("Analyzed 2 context entries"));
    }

    #[test]
    fn test_analyze_mood_detection() {
        let stressed = analyze_fallback(&[entry("terrible problem, so worried")]);
        assert_eq!(stressed.mood_tone, MoodTone::Stressed);

        let positive = analyze_fallback(&[entry("great success, happy with results")]);
        assert_eq!(positive.mood_tone, MoodTone::Positive);

        let neutral = analyze_fallback(&[entry("good news but a bad surprise")]);
        assert_eq!(neutral.mood_tone, MoodTone::Neutral);
    }

    #[test]
    fn test_priority_bump_on_urgency() {
        let task = TaskDraft::new("Urgent client meeting", "");
        assert_eq!(priority_fallback(&task), 75);
    }

    #[test]
    fn test_priority_drop_on_low_urgency() {
        let task = TaskDraft::new("Maybe reorganize bookshelf someday", "");
        assert_eq!(priority_fallback(&task), 25);
    }

    #[test]
    fn test_priority_clamped() {
        let task = TaskDraft::new("Urgent fix", "").with_priority(90);
        assert_eq!(priority_fallback(&task), 100);
        let task = TaskDraft::new("Someday item", "").with_priority(10);
        assert_eq!(priority_fallback(&task), 0);
    }

    #[test]
    fn test_priority_tie_keeps_current() {
        let task = TaskDraft::new("Urgent now, rest is optional", "").with_priority(40);
        assert_eq!(priority_fallback(&task), 40);
    }

    #[test]
    fn test_categorize_scores_keywords() {
        let task = TaskDraft::new("Urgent client meeting", "");
        let suggestion = categorize_fallback(&task, &[]);
        assert_eq!(suggestion.category, "Work");
        assert!(suggestion.tags.contains(&"meeting".to_string()));
        assert!(suggestion.tags.contains(&"urgent".to_string()));
    }

    #[test]
    fn test_categorize_prefers_known_winner() {
        let task = TaskDraft::new("Team meeting about the project", "");
        let existing = vec!["Work".to_string(), "Errands".to_string()];
        let suggestion = categorize_fallback(&task, &existing);
        assert_eq!(suggestion.category, "Work");
    }

    #[test]
    fn test_categorize_falls_back_to_first_existing() {
        let task = TaskDraft::new("Buy groceries", "");
        let existing = vec!["Errands".to_string(), "Chores".to_string()];
        let suggestion = categorize_fallback(&task, &existing);
        // Keyword winner "Shopping" is unknown, so the first existing wins.
        assert_eq!(suggestion.category, "Errands");
    }

    #[test]
    fn test_categorize_defaults_to_general() {
        let task = TaskDraft::new("Zzz", "");
        let suggestion = categorize_fallback(&task, &[]);
        assert_eq!(suggestion.category, "General");
        assert!(suggestion.tags.is_empty());
    }

    #[test]
    fn test_categorize_tag_limit() {
        let task = TaskDraft::new(
            "Urgent meeting to review the project plan",
            "asap planning review",
        );
        let suggestion = categorize_fallback(&task, &[]);
        assert!(suggestion.tags.len() <= 5);
    }

    #[test]
    fn test_enhance_keeps_existing_description() {
        let task = TaskDraft::new("Anything", "Already described");
        assert_eq!(enhance_fallback(&task), "Already described");
    }

    #[test]
    fn test_enhance_templates_by_title_keyword() {
        let meeting = TaskDraft::new("Weekly sync meeting", "");
        assert!(enhance_fallback(&meeting).starts_with("Organize and conduct"));

        let plan = TaskDraft::new("Plan offsite", "");
        let enhanced = enhance_fallback(&plan);
        assert!(enhanced.starts_with("Create a comprehensive plan for offsite"));

        let review = TaskDraft::new("Review budget", "");
        assert!(enhance_fallback(&review).starts_with("Conduct thorough review of budget"));

        let project = TaskDraft::new("Migration project", "");
        assert!(enhance_fallback(&project).starts_with("Work on Migration project"));

        let other = TaskDraft::new("Water plants", "");
        assert!(enhance_fallback(&other).starts_with("Complete Water plants"));
    }

    #[test]
    fn test_determinism() {
        let task = TaskDraft::new("Urgent project review", "plan asap");
        let a = categorize_fallback(&task, &[]);
        let b = categorize_fallback(&task, &[]);
        assert_eq!(a.category, b.category);
        assert_eq!(a.tags, b.tags);
        assert_eq!(priority_fallback(&task), priority_fallback(&task));
    }
}
