use axum::{extract::State, routing::post, Json, Router};
use tracing::{instrument, warn};

use super::dto::{DailyMealPlan, UserProfile};
use crate::{errors::ApiError, state::AppState};

pub fn meal_planner_routes() -> Router<AppState> {
    Router::new().route("/meal-planner", post(generate_meal_plan))
}

/// POST /meal-planner
/// Success is the bare plan object; any generation failure is a 500 with `detail`.
#[instrument(skip(state, profile))]
pub async fn generate_meal_plan(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<DailyMealPlan>, ApiError> {
    if let Err(reason) = profile.validate() {
        warn!(%reason, "rejecting profile");
        return Err(ApiError::bad_request(reason));
    }

    let plan = state.meal_planner.generate(&profile).await?;
    Ok(Json(plan))
}
