pub mod dto;
pub mod handlers;
pub mod machine;
pub mod registry;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/recipes/:id/ingredients/:ingredient_id/timer",
            get(handlers::timer_status),
        )
        .route(
            "/recipes/:id/ingredients/:ingredient_id/timer/start",
            post(handlers::start_timer),
        )
        .route(
            "/recipes/:id/ingredients/:ingredient_id/timer/pause",
            post(handlers::pause_timer),
        )
        .route(
            "/recipes/:id/ingredients/:ingredient_id/timer/reset",
            post(handlers::reset_timer),
        )
}
