use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::config::OpenAiConfig;
use crate::errors::GenerationError;

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Chat-completions client for OpenAI and compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::Initialization(
                "OpenAI API key is empty".into(),
            ));
        }
        let client = Client::builder().build().map_err(|e| {
            GenerationError::Initialization(format!("failed to build HTTP client: {e}"))
        })?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn body<'a>(&'a self, request: &'a ChatRequest) -> CompletionBody<'a> {
        let response_format = (request.json_output && self.config.json_mode)
            .then(|| json!({ "type": "json_object" }));
        CompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            response_format,
        }
    }
}

fn error_from_body(status: u16, body: &str) -> LlmError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => env.error.message,
        Err(_) => body.chars().take(200).collect(),
    };
    LlmError::Api { status, message }
}

fn first_choice_content(body: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Decode("response has no choices".into()))?;
    Ok(choice.message.content.unwrap_or_default())
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let body = self.body(request);
        debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            json_output = body.response_format.is_some(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            error!(%status, "chat completion rejected");
            return Err(error_from_body(status.as_u16(), &text));
        }
        first_choice_content(&text)
    }
}
