use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::recipes::repo::{Ingredient, Recipe};
use crate::state::AppState;

use super::dto::TimerView;

/// Look up the recipe and ingredient a timer belongs to, and the countdown
/// duration the recipe declares for it.
fn timer_target(
    state: &AppState,
    recipe_id: Uuid,
    ingredient_id: Uuid,
) -> Result<(Recipe, Ingredient, u64), (StatusCode, String)> {
    let Some(recipe) = state.recipes.get(recipe_id) else {
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    };
    let Some(ingredient) = recipe.ingredients.iter().find(|i| i.id == ingredient_id).cloned()
    else {
        return Err((StatusCode::NOT_FOUND, "Ingredient not found".into()));
    };
    match ingredient.cooking_time {
        Some(minutes) if minutes > 0 => {
            let secs = u64::from(minutes) * 60;
            Ok((recipe, ingredient, secs))
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            "Ingredient has no cooking time".into(),
        )),
    }
}

#[instrument(skip(state))]
pub async fn start_timer(
    State(state): State<AppState>,
    Path((recipe_id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TimerView>, (StatusCode, String)> {
    let (recipe, ingredient, duration_secs) = timer_target(&state, recipe_id, ingredient_id)?;
    let snap = state
        .timers
        .start(
            (recipe_id, ingredient_id),
            duration_secs,
            &ingredient.name,
            recipe.alerts_enabled,
            state.notifier.clone(),
        )
        .await;
    info!(%recipe_id, ingredient = %ingredient.name, duration_secs, "cooking timer started");
    Ok(Json(TimerView::new(
        recipe_id,
        ingredient_id,
        ingredient.name,
        snap,
    )))
}

#[instrument(skip(state))]
pub async fn pause_timer(
    State(state): State<AppState>,
    Path((recipe_id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TimerView>, (StatusCode, String)> {
    let (_, ingredient, duration_secs) = timer_target(&state, recipe_id, ingredient_id)?;
    match state.timers.pause((recipe_id, ingredient_id)).await {
        Some(snap) => Ok(Json(TimerView::new(
            recipe_id,
            ingredient_id,
            ingredient.name,
            snap,
        ))),
        // Pausing a never-started countdown is a no-op on an Idle timer.
        None => Ok(Json(TimerView::idle(
            recipe_id,
            ingredient_id,
            ingredient.name,
            duration_secs,
        ))),
    }
}

#[instrument(skip(state))]
pub async fn reset_timer(
    State(state): State<AppState>,
    Path((recipe_id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TimerView>, (StatusCode, String)> {
    let (_, ingredient, duration_secs) = timer_target(&state, recipe_id, ingredient_id)?;
    let view = match state.timers.reset((recipe_id, ingredient_id)).await {
        Some(snap) => TimerView::new(recipe_id, ingredient_id, ingredient.name, snap),
        None => TimerView::idle(recipe_id, ingredient_id, ingredient.name, duration_secs),
    };
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn timer_status(
    State(state): State<AppState>,
    Path((recipe_id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TimerView>, (StatusCode, String)> {
    let (_, ingredient, duration_secs) = timer_target(&state, recipe_id, ingredient_id)?;
    let view = match state.timers.status((recipe_id, ingredient_id)).await {
        Some(snap) => TimerView::new(recipe_id, ingredient_id, ingredient.name, snap),
        None => TimerView::idle(recipe_id, ingredient_id, ingredient.name, duration_secs),
    };
    Ok(Json(view))
}
