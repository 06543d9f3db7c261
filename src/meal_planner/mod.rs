pub mod dto;
pub mod handlers;
pub mod parse;
mod prompt;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::MealPlanner;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::meal_planner_routes())
}
