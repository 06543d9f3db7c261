use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, instrument, warn};

use super::dto::{CoachRequest, CoachResponse};
use super::services::reply;
use crate::{errors::ApiError, state::AppState};

pub fn coach_routes() -> Router<AppState> {
    Router::new().route("/coach", post(chat_with_coach))
}

#[instrument(skip(state, payload))]
pub async fn chat_with_coach(
    State(state): State<AppState>,
    Json(payload): Json<CoachRequest>,
) -> Result<Json<CoachResponse>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        warn!("empty coach message");
        return Err(ApiError::bad_request("message must not be empty"));
    }

    let response = reply(state.llm.as_ref(), message).await.map_err(|e| {
        error!(error = %e, "coach reply failed");
        ApiError::internal(format!("Failed to get AI response: {e}"))
    })?;
    Ok(Json(CoachResponse { response }))
}
