use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, RetryConfig};
use crate::llm::{ChatModel, OpenAiClient};
use crate::meal_planner::MealPlanner;

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ChatModel>,
    pub meal_planner: Arc<MealPlanner>,
}

impl AppState {
    /// Fails fast when the model client cannot be built (e.g. no API key).
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let client = OpenAiClient::new(config.openai.clone())?;
        info!(
            model = %client.model(),
            base_url = %config.openai.base_url,
            max_attempts = config.retry.max_attempts,
            "model client ready"
        );
        let llm = Arc::new(client) as Arc<dyn ChatModel>;

        Ok(Self::from_parts(llm, &config.retry))
    }

    pub fn from_parts(llm: Arc<dyn ChatModel>, retry: &RetryConfig) -> Self {
        let meal_planner = Arc::new(MealPlanner::new(llm.clone(), retry));
        Self { llm, meal_planner }
    }

    #[cfg(test)]
    pub fn fake(llm: Arc<dyn ChatModel>) -> Self {
        Self::from_parts(llm, &RetryConfig::default())
    }
}
