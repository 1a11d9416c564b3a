use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Measurement units accepted by the recipe form. Closed set; anything else
/// is rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    G,
    Kg,
    Ml,
    L,
    Tsp,
    Tbsp,
    Cup,
    Oz,
    Lb,
    Pcs,
    Slices,
    Pinch,
    Dash,
    Cloves,
    Sticks,
}

/// One ingredient line. `quantity` is stated in the recipe's base-serving
/// frame; `cooking_time` is minutes, with 0/absent meaning no countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub cooking_time: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub base_servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub external_url: Option<String>,
    /// Sum of ingredient cooking times, derived at save time.
    pub total_cooking_time: Option<u32>,
    pub show_cooking_time: bool,
    pub alerts_enabled: bool,
    /// Object key in image storage; the wire exposes a presigned URL instead.
    pub image_key: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Everything a recipe carries except its identity, creation stamp and
/// uploaded image. Built by `services::draft_from_body` after validation.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub base_servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub external_url: Option<String>,
    pub total_cooking_time: Option<u32>,
    pub show_cooking_time: bool,
    pub alerts_enabled: bool,
}

/// In-memory recipe collection. Insertion order is display order; state dies
/// with the process. The store trusts callers to have validated drafts.
#[derive(Default)]
pub struct RecipeStore {
    inner: RwLock<Vec<Recipe>>,
}

impl RecipeStore {
    /// Assign a fresh id and append. Returns the stored recipe.
    pub fn add(&self, draft: RecipeDraft) -> Recipe {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            base_servings: draft.base_servings,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            external_url: draft.external_url,
            total_cooking_time: draft.total_cooking_time,
            show_cooking_time: draft.show_cooking_time,
            alerts_enabled: draft.alerts_enabled,
            image_key: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.inner.write().unwrap().push(recipe.clone());
        recipe
    }

    /// Replace all submitted fields of the matching recipe, preserving its
    /// id, creation stamp and uploaded image. `None` if the id is unknown.
    pub fn update(&self, id: Uuid, draft: RecipeDraft) -> Option<Recipe> {
        let mut recipes = self.inner.write().unwrap();
        let recipe = recipes.iter_mut().find(|r| r.id == id)?;
        recipe.name = draft.name;
        recipe.description = draft.description;
        recipe.base_servings = draft.base_servings;
        recipe.ingredients = draft.ingredients;
        recipe.instructions = draft.instructions;
        recipe.external_url = draft.external_url;
        recipe.total_cooking_time = draft.total_cooking_time;
        recipe.show_cooking_time = draft.show_cooking_time;
        recipe.alerts_enabled = draft.alerts_enabled;
        Some(recipe.clone())
    }

    /// Swap the stored image key, returning the previous one so the caller
    /// can clean up the old object. `None` if the id is unknown.
    pub fn set_image_key(&self, id: Uuid, key: Option<String>) -> Option<Option<String>> {
        let mut recipes = self.inner.write().unwrap();
        let recipe = recipes.iter_mut().find(|r| r.id == id)?;
        Some(std::mem::replace(&mut recipe.image_key, key))
    }

    /// Remove the matching recipe. `false` (and no change) if absent.
    pub fn delete(&self, id: Uuid) -> bool {
        let mut recipes = self.inner.write().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        recipes.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<Recipe> {
        self.inner.read().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub fn list(&self) -> Vec<Recipe> {
        self.inner.read().unwrap().clone()
    }

    /// Case-insensitive substring match over name and description, in
    /// insertion order (the list view's search box).
    pub fn search(&self, query: &str) -> Vec<Recipe> {
        let q = query.to_lowercase();
        self.inner
            .read()
            .unwrap()
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&q) || r.description.to_lowercase().contains(&q)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.into(),
            description: "test dish".into(),
            base_servings: 4,
            ingredients: vec![Ingredient {
                id: Uuid::new_v4(),
                name: "Spaghetti".into(),
                quantity: 400.0,
                unit: Unit::G,
                cooking_time: Some(10),
            }],
            instructions: "Boil.\nDrain.".into(),
            external_url: None,
            total_cooking_time: Some(10),
            show_cooking_time: true,
            alerts_enabled: false,
        }
    }

    #[test]
    fn add_assigns_unique_ids_in_insertion_order() {
        let store = RecipeStore::default();
        let a = store.add(draft("First"));
        let b = store.add(draft("Second"));
        assert_ne!(a.id, b.id);
        let names: Vec<_> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn update_preserves_id_and_image_and_noops_on_missing() {
        let store = RecipeStore::default();
        let stored = store.add(draft("Old"));
        assert!(store.set_image_key(stored.id, Some("recipes/x.jpg".into())).is_some());

        let updated = store.update(stored.id, draft("New")).unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.image_key.as_deref(), Some("recipes/x.jpg"));

        assert!(store.update(Uuid::new_v4(), draft("Ghost")).is_none());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn delete_is_a_noop_when_absent() {
        let store = RecipeStore::default();
        let stored = store.add(draft("Keep"));
        assert!(!store.delete(Uuid::new_v4()));
        assert_eq!(store.list().len(), 1);
        assert!(store.delete(stored.id));
        assert!(store.get(stored.id).is_none());
    }

    #[test]
    fn search_matches_name_and_description_case_insensitively() {
        let store = RecipeStore::default();
        store.add(draft("Spaghetti Carbonara"));
        let mut other = draft("Cookies");
        other.description = "chewy carbonara-free treats".into();
        store.add(other);

        let hits = store.search("CARBON");
        assert_eq!(hits.len(), 2);
        let hits = store.search("cookie");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Cookies");
        assert!(store.search("tiramisu").is_empty());
    }
}
