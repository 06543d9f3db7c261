use tracing::{debug, instrument};

use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError};

pub const COACH_PROMPT: &str = "You are a friendly and supportive AI gym coach named Coach AI. Your role is to:
1. Provide helpful fitness and nutrition advice in a conversational, friendly manner
2. Naturally incorporate motivational encouragement in your responses
3. Answer health-related questions clearly while maintaining a supportive tone
4. Give scientifically-backed recommendations in an easy-to-understand way
5. Be empathetic and understanding while helping users achieve their fitness goals

Always maintain a friendly, conversational tone while being helpful and professional.";

const TEMPERATURE: f32 = 1.0;

/// Single-turn: no history is kept between calls.
#[instrument(skip_all, fields(message_len = message.len()))]
pub async fn reply(llm: &dyn ChatModel, message: &str) -> Result<String, LlmError> {
    let request = ChatRequest::new(vec![
        ChatMessage::system(COACH_PROMPT),
        ChatMessage::user(message),
    ])
    .with_temperature(TEMPERATURE);

    let answer = llm.complete(&request).await?;
    if answer.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    debug!(answer_len = answer.len(), "coach replied");
    Ok(answer)
}
