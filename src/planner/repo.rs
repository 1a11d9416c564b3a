use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];
}

/// One slot of the planner grid. The recipe reference is weak: the plan
/// never owns recipe data, and resolution treats a missing id as "no meal".
/// `rotate` is recorded intent only; no rotation engine consumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanCell {
    pub recipe_id: Option<Uuid>,
    pub rotate: bool,
}

/// The 7-day × 4-meal grid. All 28 cells exist from construction on; cells
/// are only ever replaced, never added or removed.
pub struct MealPlanStore {
    cells: RwLock<HashMap<(Weekday, MealType), PlanCell>>,
}

impl Default for MealPlanStore {
    fn default() -> Self {
        let mut cells = HashMap::with_capacity(28);
        for day in Weekday::ALL {
            for meal in MealType::ALL {
                cells.insert((day, meal), PlanCell::default());
            }
        }
        Self { cells: RwLock::new(cells) }
    }
}

impl MealPlanStore {
    /// Wholesale replace of a cell: both the recipe reference and the rotate
    /// flag are overwritten. Last write wins, never a merge.
    pub fn set_cell(&self, day: Weekday, meal: MealType, recipe_id: Option<Uuid>, rotate: bool) {
        self.cells.write().unwrap().insert((day, meal), PlanCell { recipe_id, rotate });
    }

    /// Flip only the rotate flag, preserving the recipe reference. The
    /// read-modify-write runs under the write lock, so concurrent callers
    /// cannot interleave.
    pub fn toggle_rotation(&self, day: Weekday, meal: MealType) -> PlanCell {
        let mut cells = self.cells.write().unwrap();
        let cell = cells.entry((day, meal)).or_default();
        cell.rotate = !cell.rotate;
        *cell
    }

    /// Total over the grid: the cell for every (day, meal) pair exists.
    pub fn get_cell(&self, day: Weekday, meal: MealType) -> PlanCell {
        self.cells.read().unwrap().get(&(day, meal)).copied().unwrap_or_default()
    }

    /// Cascade hook for recipe deletion: drop every reference to the id,
    /// leaving the rotate flags as they were. Returns how many cells changed.
    pub fn clear_recipe(&self, recipe_id: Uuid) -> usize {
        let mut cells = self.cells.write().unwrap();
        let mut cleared = 0;
        for cell in cells.values_mut() {
            if cell.recipe_id == Some(recipe_id) {
                cell.recipe_id = None;
                cleared += 1;
            }
        }
        cleared
    }
}
