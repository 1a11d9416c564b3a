//! Serving scaler: proportional ingredient quantities for a requested
//! serving count. Scaling keeps full float precision; two-decimal rounding
//! happens only when a quantity is formatted for display.

use crate::recipes::repo::Ingredient;

/// targetServings ÷ baseServings, applied uniformly to every quantity.
pub fn scale_factor(base_servings: u32, target_servings: u32) -> f64 {
    f64::from(target_servings) / f64::from(base_servings)
}

/// Clamp a requested serving count to ≥ 1, defaulting to the recipe's base
/// servings when nothing was requested (the detail view's initial state).
pub fn effective_servings(requested: Option<i64>, base_servings: u32) -> u32 {
    match requested {
        Some(n) => n.clamp(1, u32::MAX as i64) as u32,
        None => base_servings,
    }
}

/// Scale every quantity by `target / base`, leaving id, name, unit and
/// cooking time untouched. Identity when target equals base.
pub fn scale_ingredients(
    base_servings: u32,
    ingredients: &[Ingredient],
    target_servings: u32,
) -> Vec<Ingredient> {
    let factor = scale_factor(base_servings, target_servings);
    ingredients
        .iter()
        .map(|ing| Ingredient {
            quantity: ing.quantity * factor,
            ..ing.clone()
        })
        .collect()
}

/// Display formatting for a scaled quantity.
pub fn format_quantity(quantity: f64) -> String {
    format!("{quantity:.2}")
}
