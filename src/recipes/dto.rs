use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::Unit;

/// Create/edit form submission. An edit replaces every field here; the
/// uploaded image travels separately through the image endpoint.
#[derive(Debug, Deserialize)]
pub struct RecipeBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_servings: u32,
    pub ingredients: Vec<IngredientBody>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default = "default_show_cooking_time")]
    pub show_cooking_time: bool,
    #[serde(default)]
    pub alerts_enabled: bool,
}

fn default_show_cooking_time() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct IngredientBody {
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    /// Minutes; 0 or absent means no countdown for this ingredient.
    #[serde(default)]
    pub cooking_time: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Substring search over recipe names and descriptions.
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    /// Target serving count; non-positive values clamp to 1.
    #[serde(default)]
    pub servings: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub base_servings: u32,
    pub ingredient_count: usize,
    pub total_cooking_time: Option<u32>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// One ingredient line scaled to the requested servings. `quantity` keeps
/// full precision; `display` is the two-decimal rendering.
#[derive(Debug, Serialize)]
pub struct ScaledIngredient {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub display: String,
    pub unit: Unit,
    pub cooking_time: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub base_servings: u32,
    /// The serving count the ingredient list below is scaled to.
    pub servings: u32,
    pub ingredients: Vec<ScaledIngredient>,
    pub instructions: String,
    /// Instructions split into non-empty steps, as the detail view lists them.
    pub steps: Vec<String>,
    pub external_url: Option<String>,
    pub total_cooking_time: Option<u32>,
    pub show_cooking_time: bool,
    pub alerts_enabled: bool,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ImageUploaded {
    pub image_url: String,
}
