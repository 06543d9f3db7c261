use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::llm::LlmError;

/// Everything that can go wrong while turning a profile into a meal plan.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("model unavailable after {attempts} attempt(s): {cause}")]
    ModelUnavailable {
        attempts: u32,
        #[source]
        cause: LlmError,
    },

    /// `raw` keeps the full model payload for operators; it is not part of the message.
    #[error("invalid JSON from model: {reason}")]
    MalformedOutput { reason: String, raw: String },

    #[error("{}", missing_key_message(.key, .meal.as_deref()))]
    SchemaViolation {
        key: String,
        meal: Option<String>,
    },

    #[error("invalid value for {meal}.{field}: {reason}")]
    TypeCoercion {
        meal: String,
        field: String,
        reason: String,
    },
}

fn missing_key_message(key: &str, meal: Option<&str>) -> String {
    match meal {
        Some(meal) => format!("missing required key in {meal}: {key}"),
        None => format!("missing required key: {key}"),
    }
}

/// Error body returned to HTTP clients: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        Self::internal(format!("Failed to generate meal plan: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
