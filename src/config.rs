//! Configuration for the suggestion core.

use serde::{Deserialize, Serialize};

/// Configuration for backends and gateway policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// API key for the hosted backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Model for the hosted backend
    #[serde(default = "default_model")]
    pub openai_model: String,

    /// Completion URL of the local backend, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_llm_url: Option<String>,

    /// How long a rate-limit signal keeps the hosted backend cooling down
    #[serde(default = "default_cooldown_secs")]
    pub rate_limit_cooldown_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_cooldown_secs() -> u64 {
    300
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: default_model(),
            local_llm_url: None,
            rate_limit_cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl SuggestConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_MODEL`, `LOCAL_LLM_URL` and
    /// `TASKSAGE_RATE_LIMIT_COOLDOWN_SECS`. Missing variables leave the
    /// corresponding backend unconfigured.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            local_llm_url: std::env::var("LOCAL_LLM_URL").ok().filter(|u| !u.is_empty()),
            rate_limit_cooldown_secs: std::env::var("TASKSAGE_RATE_LIMIT_COOLDOWN_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_cooldown_secs),
        }
    }

    /// Whether any backend can be built from this configuration.
    pub fn any_backend_configured(&self) -> bool {
        self.openai_api_key.is_some() || self.local_llm_url.is_some()
    }
}
