pub mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meal-plan", get(handlers::get_plan))
        .route(
            "/meal-plan/:day/:meal",
            get(handlers::get_cell).put(handlers::set_cell),
        )
        .route(
            "/meal-plan/:day/:meal/rotation",
            post(handlers::toggle_rotation),
        )
}
