use std::time::Duration;

use serde::Deserialize;

use crate::errors::GenerationError;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Provider honours `response_format: json_object`.
    pub json_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub retry: RetryConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GenerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| GenerationError::Initialization("OPENAI_API_KEY is not set".into()))?;

        let openai = OpenAiConfig {
            api_key,
            base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".into()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            json_mode: lookup("OPENAI_JSON_MODE")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        };

        let defaults = RetryConfig::default();
        let retry = RetryConfig {
            max_attempts: lookup("MEAL_PLANNER_MAX_RETRIES")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_attempts),
            delay_ms: lookup("MEAL_PLANNER_RETRY_DELAY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.delay_ms),
        };

        Ok(Self { openai, retry })
    }
}
