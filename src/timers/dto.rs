use serde::Serialize;
use uuid::Uuid;

use super::machine::TimerState;
use super::registry::TimerSnapshot;

#[derive(Debug, Serialize)]
pub struct TimerView {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient: String,
    pub state: TimerState,
    pub remaining_secs: u64,
    pub duration_secs: u64,
}

impl TimerView {
    pub fn new(
        recipe_id: Uuid,
        ingredient_id: Uuid,
        ingredient: String,
        snap: TimerSnapshot,
    ) -> Self {
        Self {
            recipe_id,
            ingredient_id,
            ingredient,
            state: snap.state,
            remaining_secs: snap.remaining_secs,
            duration_secs: snap.duration_secs,
        }
    }

    /// View for a countdown that was never started: Idle at full duration.
    pub fn idle(recipe_id: Uuid, ingredient_id: Uuid, ingredient: String, duration_secs: u64) -> Self {
        Self {
            recipe_id,
            ingredient_id,
            ingredient,
            state: TimerState::Idle,
            remaining_secs: duration_secs,
            duration_secs,
        }
    }
}
