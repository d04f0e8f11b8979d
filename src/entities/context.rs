//! Context entries and their analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SuggestError;

/// Origin of a free-text context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContextSource {
    Email,
    Whatsapp,
    Note,
    Meeting,
    #[default]
    Other,
}

impl std::fmt::Display for ContextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Whatsapp => write!(f, "whatsapp"),
            Self::Note => write!(f, "note"),
            Self::Meeting => write!(f, "meeting"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ContextSource {
    type Err = SuggestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::Whatsapp),
            "note" => Ok(Self::Note),
            "meeting" => Ok(Self::Meeting),
            "other" => Ok(Self::Other),
            _ => Err(SuggestError::InvalidInput {
                reason: format!("unknown context source '{s}'"),
            }),
        }
    }
}

/// A free-text record (email, note, meeting, ...) used as situational
/// input for suggestions.
///
/// Immutable once analyzed, except for the `insights` cache and the
/// `processed` flag which the caller may write back after analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Raw entry text
    pub content: String,

    /// Where the entry came from
    #[serde(default)]
    pub source: ContextSource,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,

    /// Cached analysis result, written by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<serde_json::Value>,

    /// Whether this entry has been through analysis
    #[serde(default)]
    pub processed: bool,
}

impl ContextEntry {
    /// Create a new context entry.
    pub fn new(content: impl Into<String>, source: ContextSource) -> Self {
        Self {
            content: content.into(),
            source,
            created_at: Some(Utc::now()),
            insights: None,
            processed: false,
        }
    }
}

/// Overall mood detected in a batch of context entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoodTone {
    Positive,
    #[default]
    Neutral,
    Stressed,
}

impl MoodTone {
    /// Lenient parse for model output: anything unrecognized is neutral.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "positive" => Self::Positive,
            "stressed" => Self::Stressed,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for MoodTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Stressed => write!(f, "stressed"),
        }
    }
}

/// Structured insight extracted from a batch of context entries.
///
/// Produced fresh per request; the core never persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextAnalysis {
    /// Brief summary of the context
    pub summary: String,

    /// Main themes/topics detected
    #[serde(default, rename = "keyThemes")]
    pub key_themes: Vec<String>,

    /// Urgent items mentioned
    #[serde(default, rename = "urgencyIndicators")]
    pub urgency_indicators: Vec<String>,

    /// Deadlines or other time-sensitive items
    #[serde(default, rename = "timeConstraints")]
    pub time_constraints: Vec<String>,

    /// Overall mood/tone
    #[serde(default, rename = "moodTone")]
    pub mood_tone: MoodTone,
}

impl ContextAnalysis {
    /// The fixed analysis returned when no context is available.
    pub fn neutral() -> Self {
        Self {
            summary: "No context available".to_string(),
            key_themes: Vec::new(),
            urgency_indicators: Vec::new(),
            time_constraints: Vec::new(),
            mood_tone: MoodTone::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            "email".parse::<ContextSource>().unwrap(),
            ContextSource::Email
        );
        assert_eq!(
            "Meeting".parse::<ContextSource>().unwrap(),
            ContextSource::Meeting
        );
        assert!("telegram".parse::<ContextSource>().is_err());
    }

    #[test]
    fn test_mood_lenient_parsing() {
        assert_eq!(MoodTone::parse_lenient("Positive"), MoodTone::Positive);
        assert_eq!(MoodTone::parse_lenient("stressed"), MoodTone::Stressed);
        assert_eq!(MoodTone::parse_lenient("ecstatic"), MoodTone::Neutral);
        assert_eq!(MoodTone::parse_lenient(""), MoodTone::Neutral);
    }

    #[test]
    fn test_neutral_analysis() {
        let analysis = ContextAnalysis::neutral();
        assert_eq!(analysis.summary, "No context available");
        assert!(analysis.key_themes.is_empty());
        assert!(analysis.urgency_indicators.is_empty());
        assert_eq!(analysis.mood_tone, MoodTone::Neutral);
    }

    #[test]
    fn test_entry_new_defaults() {
        let entry = ContextEntry::new("standup at 9", ContextSource::Meeting);
        assert!(!entry.processed);
        assert!(entry.insights.is_none());
        assert!(entry.created_at.is_some());
    }
}
