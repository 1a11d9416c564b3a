use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{MealType, Weekday};

/// Wholesale cell replacement. `rotate` defaults to false when omitted:
/// assigning a recipe without it clears a previously set flag.
#[derive(Debug, Deserialize)]
pub struct SetCellBody {
    pub recipe_id: Option<Uuid>,
    #[serde(default)]
    pub rotate: bool,
}

#[derive(Debug, Serialize)]
pub struct CellView {
    pub day: Weekday,
    pub meal_type: MealType,
    pub recipe_id: Option<Uuid>,
    /// Resolved lazily; a dangling reference renders as no meal.
    pub recipe_name: Option<String>,
    pub rotate: bool,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub day: Weekday,
    pub meals: Vec<CellView>,
}
