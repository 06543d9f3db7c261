use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{DailyMealPlan, UserProfile};
use super::parse::{build_plan, parse_plan_json, preview};
use super::prompt::{render_prompt, SYSTEM_PROMPT};
use crate::config::RetryConfig;
use crate::errors::GenerationError;
use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError};

const TEMPERATURE: f32 = 0.5;

/// Holds only immutable settings and the shared model handle, so one
/// instance serves any number of concurrent requests.
pub struct MealPlanner {
    llm: Arc<dyn ChatModel>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl MealPlanner {
    pub fn new(llm: Arc<dyn ChatModel>, retry: &RetryConfig) -> Self {
        Self {
            llm,
            max_attempts: retry.max_attempts.max(1),
            retry_delay: retry.delay(),
        }
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), goal = %profile.primary_goal))]
    pub async fn generate(&self, profile: &UserProfile) -> Result<DailyMealPlan, GenerationError> {
        let prompt = render_prompt(profile);
        let content = self.request_completion(&prompt).await?;

        let result = parse_plan_json(&content).and_then(|data| build_plan(&data));
        match &result {
            Ok(_) => info!("meal plan generated"),
            Err(GenerationError::MalformedOutput { reason, raw }) => error!(
                %reason,
                raw_len = raw.len(),
                preview = %preview(raw),
                "model output unusable"
            ),
            Err(e) => error!(error = %e, "meal plan rejected"),
        }
        result
    }

    /// Constant-delay retry on provider errors and blank responses.
    async fn request_completion(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ])
        .with_temperature(TEMPERATURE)
        .with_json_output();

        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(attempt, max_attempts = self.max_attempts, "requesting meal plan from model");

            let cause = match self.llm.complete(&request).await {
                Ok(content) if !content.trim().is_empty() => {
                    info!(attempt, preview = %preview(&content), "model response received");
                    return Ok(content);
                }
                Ok(_) => {
                    warn!(attempt, "model returned an empty response");
                    LlmError::EmptyResponse
                }
                Err(e) => {
                    error!(attempt, error = %e, "model call failed");
                    e
                }
            };

            if attempt >= self.max_attempts {
                error!(attempts = attempt, error = %cause, "giving up on model");
                return Err(GenerationError::ModelUnavailable {
                    attempts: attempt,
                    cause,
                });
            }
            info!(attempt, max_attempts = self.max_attempts, delay = ?self.retry_delay, "retrying");
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}
