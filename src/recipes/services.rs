use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::scaling;
use crate::state::AppState;

use super::dto::{RecipeBody, RecipeDetails, RecipeListItem, ScaledIngredient};
use super::repo::{Ingredient, Recipe, RecipeDraft, RecipeStore, Unit};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please enter a recipe name")]
    EmptyName,
    #[error("Please fill in all ingredient names")]
    UnnamedIngredient,
    #[error("Base servings must be at least 1")]
    ZeroServings,
    #[error("Ingredient quantities must be finite and non-negative")]
    BadQuantity,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image size must be less than 5MB")]
    TooLarge,
    #[error("Only JPG, PNG, and WEBP images are allowed")]
    UnsupportedType,
}

/// Validate a submitted form and turn it into a store draft. Runs before any
/// store mutation; a rejection leaves no partial state behind.
///
/// `total_cooking_time` is derived here, at save time, from the submitted
/// ingredients. Every edit resubmits the full ingredient list, so the stored
/// total can never go stale against them.
pub fn draft_from_body(body: RecipeBody) -> Result<RecipeDraft, ValidationError> {
    if body.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if body.base_servings < 1 {
        return Err(ValidationError::ZeroServings);
    }
    for ing in &body.ingredients {
        if ing.name.trim().is_empty() {
            return Err(ValidationError::UnnamedIngredient);
        }
        if !ing.quantity.is_finite() || ing.quantity < 0.0 {
            return Err(ValidationError::BadQuantity);
        }
    }

    let total: u32 = body.ingredients.iter().filter_map(|i| i.cooking_time).sum();
    let ingredients = body
        .ingredients
        .into_iter()
        .map(|i| Ingredient {
            id: Uuid::new_v4(),
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
            cooking_time: i.cooking_time,
        })
        .collect();

    Ok(RecipeDraft {
        name: body.name,
        description: body.description,
        base_servings: body.base_servings,
        ingredients,
        instructions: body.instructions,
        external_url: body.external_url,
        total_cooking_time: (total > 0).then_some(total),
        show_cooking_time: body.show_cooking_time,
        alerts_enabled: body.alerts_enabled,
    })
}

/// Replace a recipe's fields. Timers for the old ingredient set are
/// cancelled so no countdown keeps ticking against replaced state.
pub async fn update_recipe(state: &AppState, id: Uuid, draft: RecipeDraft) -> Option<Recipe> {
    let updated = state.recipes.update(id, draft)?;
    state.timers.cancel_for_recipe(id).await;
    Some(updated)
}

/// Delete a recipe and cascade: planner cells referencing it are cleared,
/// its timers cancelled, and its stored image removed best-effort.
pub async fn delete_recipe(state: &AppState, id: Uuid) -> bool {
    let Some(recipe) = state.recipes.get(id) else {
        return false;
    };
    state.recipes.delete(id);
    let cleared = state.plan.clear_recipe(id);
    if cleared > 0 {
        debug!(%id, cleared, "cleared meal plan cells for deleted recipe");
    }
    state.timers.cancel_for_recipe(id).await;
    if let Some(key) = recipe.image_key {
        if let Err(e) = state.storage.delete_object(&key).await {
            warn!(error = %e, key, "failed to delete recipe image; continuing");
        }
    }
    true
}

/// Pre-upload checks the core enforces before calling storage. Returns the
/// object extension for the accepted type.
pub fn validate_image(content_type: &str, len: usize) -> Result<&'static str, ImageError> {
    if len > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }
    ext_from_mime(content_type).ok_or(ImageError::UnsupportedType)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Upload a validated image and attach it to the recipe. The store is only
/// touched after the upload succeeded; a failed upload aborts the whole
/// submission. The previous object, if any, is deleted best-effort.
pub async fn attach_image(
    state: &AppState,
    recipe_id: Uuid,
    ext: &str,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<String> {
    let key = format!("recipes/{}/{}.{}", recipe_id, Uuid::new_v4(), ext);
    state.storage.put_object(&key, body, content_type).await?;

    let previous = state
        .recipes
        .set_image_key(recipe_id, Some(key.clone()))
        .flatten();
    if let Some(old) = previous {
        if let Err(e) = state.storage.delete_object(&old).await {
            warn!(error = %e, key = old, "failed to delete replaced recipe image; continuing");
        }
    }

    state
        .storage
        .presign_get(&key, state.config.image_url_ttl_secs)
        .await
}

/// Presigned image URL for a recipe, or nothing. A presign failure degrades
/// to an image-less view rather than failing the read.
pub async fn image_url(state: &AppState, recipe: &Recipe) -> Option<String> {
    let key = recipe.image_key.as_deref()?;
    match state.storage.presign_get(key, state.config.image_url_ttl_secs).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, key, "failed to presign recipe image");
            None
        }
    }
}

pub async fn list_item(state: &AppState, recipe: Recipe) -> RecipeListItem {
    let image_url = image_url(state, &recipe).await;
    RecipeListItem {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        base_servings: recipe.base_servings,
        ingredient_count: recipe.ingredients.len(),
        total_cooking_time: recipe.total_cooking_time,
        image_url,
        created_at: recipe.created_at,
    }
}

/// Detail view assembly: ingredients scaled to the requested servings,
/// instructions split into displayable steps.
pub async fn details(state: &AppState, recipe: Recipe, requested: Option<i64>) -> RecipeDetails {
    let servings = scaling::effective_servings(requested, recipe.base_servings);
    let scaled = scaling::scale_ingredients(recipe.base_servings, &recipe.ingredients, servings);
    let image_url = image_url(state, &recipe).await;

    let ingredients = scaled
        .into_iter()
        .map(|ing| ScaledIngredient {
            id: ing.id,
            name: ing.name,
            display: scaling::format_quantity(ing.quantity),
            quantity: ing.quantity,
            unit: ing.unit,
            cooking_time: ing.cooking_time,
        })
        .collect();

    let steps = recipe
        .instructions
        .split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    RecipeDetails {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        base_servings: recipe.base_servings,
        servings,
        ingredients,
        instructions: recipe.instructions,
        steps,
        external_url: recipe.external_url,
        total_cooking_time: recipe.total_cooking_time,
        show_cooking_time: recipe.show_cooking_time,
        alerts_enabled: recipe.alerts_enabled,
        image_url,
        created_at: recipe.created_at,
    }
}

/// The two demo recipes the catalog ships with.
pub fn seed_sample_recipes(store: &RecipeStore) {
    let ing = |name: &str, quantity: f64, unit: Unit| Ingredient {
        id: Uuid::new_v4(),
        name: name.into(),
        quantity,
        unit,
        cooking_time: None,
    };

    store.add(RecipeDraft {
        name: "Spaghetti Carbonara".into(),
        description: "A classic Italian pasta dish with eggs, cheese, pancetta, and black pepper."
            .into(),
        base_servings: 4,
        ingredients: vec![
            ing("Spaghetti", 400.0, Unit::G),
            ing("Eggs", 4.0, Unit::Pcs),
            ing("Pancetta", 200.0, Unit::G),
            ing("Parmesan cheese", 100.0, Unit::G),
            ing("Black pepper", 2.0, Unit::Tsp),
        ],
        instructions: "Cook spaghetti according to package directions.\nFry pancetta until crispy.\nMix eggs and cheese.\nCombine hot pasta with pancetta.\nAdd egg mixture off heat, stirring quickly.\nSeason with black pepper and serve.".into(),
        external_url: None,
        total_cooking_time: None,
        show_cooking_time: true,
        alerts_enabled: false,
    });

    store.add(RecipeDraft {
        name: "Chocolate Chip Cookies".into(),
        description:
            "Classic homemade chocolate chip cookies that are soft and chewy inside with crispy edges."
                .into(),
        base_servings: 24,
        ingredients: vec![
            ing("All-purpose flour", 280.0, Unit::G),
            ing("Butter", 226.0, Unit::G),
            ing("Brown sugar", 200.0, Unit::G),
            ing("Eggs", 2.0, Unit::Pcs),
            ing("Vanilla extract", 2.0, Unit::Tsp),
            ing("Baking soda", 1.0, Unit::Tsp),
            ing("Salt", 1.0, Unit::Tsp),
            ing("Chocolate chips", 340.0, Unit::G),
        ],
        instructions: "Preheat oven to 375°F (190°C).\nCream butter and sugars together.\nBeat in eggs and vanilla.\nMix in flour, baking soda, and salt.\nFold in chocolate chips.\nDrop spoonfuls onto baking sheet.\nBake for 9-11 minutes until golden.\nCool on wire rack.".into(),
        external_url: None,
        total_cooking_time: None,
        show_cooking_time: true,
        alerts_enabled: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::dto::IngredientBody;

    fn body() -> RecipeBody {
        RecipeBody {
            name: "Carbonara".into(),
            description: String::new(),
            base_servings: 4,
            ingredients: vec![
                IngredientBody {
                    name: "Spaghetti".into(),
                    quantity: 400.0,
                    unit: Unit::G,
                    cooking_time: Some(10),
                },
                IngredientBody {
                    name: "Pancetta".into(),
                    quantity: 200.0,
                    unit: Unit::G,
                    cooking_time: Some(8),
                },
            ],
            instructions: String::new(),
            external_url: None,
            show_cooking_time: true,
            alerts_enabled: false,
        }
    }

    #[test]
    fn total_cooking_time_is_derived_at_save_time() {
        let draft = draft_from_body(body()).unwrap();
        assert_eq!(draft.total_cooking_time, Some(18));
    }

    #[test]
    fn recipes_without_countdowns_have_no_total() {
        let mut b = body();
        for ing in &mut b.ingredients {
            ing.cooking_time = None;
        }
        let draft = draft_from_body(b).unwrap();
        assert_eq!(draft.total_cooking_time, None);
    }

    #[test]
    fn blank_names_are_rejected_before_any_mutation() {
        let mut b = body();
        b.name = "   ".into();
        assert!(matches!(draft_from_body(b), Err(ValidationError::EmptyName)));

        let mut b = body();
        b.ingredients[1].name = String::new();
        assert!(matches!(
            draft_from_body(b),
            Err(ValidationError::UnnamedIngredient)
        ));
    }

    #[test]
    fn zero_servings_and_bad_quantities_are_rejected() {
        let mut b = body();
        b.base_servings = 0;
        assert!(matches!(draft_from_body(b), Err(ValidationError::ZeroServings)));

        let mut b = body();
        b.ingredients[0].quantity = -1.0;
        assert!(matches!(draft_from_body(b), Err(ValidationError::BadQuantity)));

        let mut b = body();
        b.ingredients[0].quantity = f64::NAN;
        assert!(matches!(draft_from_body(b), Err(ValidationError::BadQuantity)));
    }

    #[test]
    fn image_validation_enforces_size_and_type() {
        assert_eq!(validate_image("image/jpeg", 1024).unwrap(), "jpg");
        assert_eq!(validate_image("image/jpg", 1024).unwrap(), "jpg");
        assert_eq!(validate_image("image/png", 1024).unwrap(), "png");
        assert_eq!(validate_image("image/webp", 1024).unwrap(), "webp");
        assert!(matches!(
            validate_image("image/gif", 1024),
            Err(ImageError::UnsupportedType)
        ));
        assert!(matches!(
            validate_image("image/png", MAX_IMAGE_BYTES + 1),
            Err(ImageError::TooLarge)
        ));
    }

    #[test]
    fn seeding_adds_the_two_demo_recipes() {
        let store = RecipeStore::default();
        seed_sample_recipes(&store);
        let names: Vec<_> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Spaghetti Carbonara", "Chocolate Chip Cookies"]);
    }
}
