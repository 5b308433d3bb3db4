//! Recipe history: an ordered, deduplicated collection of generated recipes.
//!
//! The free functions are pure transformations of the collection. The
//! [`RecipeHistory`] wrapper applies them through the persistent store's
//! read-modify-write contract and enforces the size cap.

use std::sync::Arc;

use crate::storage::{PersistentStore, StorageMedium};
use crate::types::{EnrichmentPatch, Recipe, RecipeSignature};

/// Storage key holding the serialized history.
pub const HISTORY_KEY: &str = "jhatpatRecipes";

/// Default maximum number of history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Insert `recipe` at the front, or replace and promote the entry with the
/// same signature.
///
/// Enrichment fields missing from `recipe` are carried over from the entry
/// it replaces.
pub fn add_or_promote(mut history: Vec<Recipe>, mut recipe: Recipe) -> Vec<Recipe> {
    let signature = recipe.signature();

    if let Some(index) = history.iter().position(|r| r.signature() == signature) {
        let existing = history.remove(index);
        if recipe.image_uri.is_none() {
            recipe.image_uri = existing.image_uri;
        }
        if recipe.translation.is_none() {
            recipe.translation = existing.translation;
        }
        tracing::debug!(recipe = %recipe.name, from = index, "Promoting existing history entry");
    }

    history.insert(0, recipe);
    history
}

/// Merge `patch` into the entry matching `signature`, keeping its position.
///
/// Without a match the history is returned unchanged.
pub fn update_enrichment(
    mut history: Vec<Recipe>,
    signature: &RecipeSignature,
    patch: &EnrichmentPatch,
) -> Vec<Recipe> {
    match history.iter_mut().find(|r| &r.signature() == signature) {
        Some(entry) => patch.apply_to(entry),
        None => {
            tracing::debug!(signature = %signature, "No history entry for enrichment, skipping");
        }
    }
    history
}

/// Add a batch of newly generated recipes, keeping their order at the top.
pub fn record_generated(history: Vec<Recipe>, recipes: &[Recipe]) -> Vec<Recipe> {
    recipes
        .iter()
        .rev()
        .fold(history, |acc, recipe| add_or_promote(acc, recipe.clone()))
}

/// Drop the oldest entries beyond `limit`. `None` means unbounded.
pub fn enforce_limit(mut history: Vec<Recipe>, limit: Option<usize>) -> Vec<Recipe> {
    if let Some(limit) = limit {
        if history.len() > limit {
            tracing::debug!(evicted = history.len() - limit, "Evicting oldest history entries");
            history.truncate(limit);
        }
    }
    history
}

/// History collection persisted in a [`PersistentStore`].
#[derive(Clone)]
pub struct RecipeHistory {
    store: PersistentStore<Vec<Recipe>>,
    limit: Option<usize>,
}

impl RecipeHistory {
    pub fn new(store: PersistentStore<Vec<Recipe>>, limit: Option<usize>) -> Self {
        Self { store, limit }
    }

    /// Open the history stored under [`HISTORY_KEY`] on `medium`.
    ///
    /// The returned history is still loading; call [`load`](Self::load).
    pub fn on_medium(medium: Arc<dyn StorageMedium>, limit: Option<usize>) -> Self {
        Self::new(PersistentStore::new(medium, HISTORY_KEY, Vec::new()), limit)
    }

    pub fn load(&self) {
        self.store.load();
    }

    pub fn store(&self) -> &PersistentStore<Vec<Recipe>> {
        &self.store
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Newest first.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.store.get()
    }

    pub fn len(&self) -> usize {
        self.store.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Recipe> {
        self.store.with(|h| h.get(index).cloned())
    }

    pub fn find(&self, signature: &RecipeSignature) -> Option<Recipe> {
        self.store
            .with(|h| h.iter().find(|r| &r.signature() == signature).cloned())
    }

    pub fn add_or_promote(&self, recipe: Recipe) {
        let limit = self.limit;
        self.store
            .update(move |h| enforce_limit(add_or_promote(h, recipe), limit));
    }

    pub fn record_generated(&self, recipes: &[Recipe]) {
        let recipes = recipes.to_vec();
        let limit = self.limit;
        self.store
            .update(move |h| enforce_limit(record_generated(h, &recipes), limit));
    }

    pub fn update_enrichment(&self, signature: &RecipeSignature, patch: EnrichmentPatch) {
        if patch.is_empty() {
            return;
        }
        let signature = signature.clone();
        self.store
            .update(move |h| update_enrichment(h, &signature, &patch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryMedium;
    use crate::types::TranslatedRecipe;

    fn recipe(name: &str, instructions: &str) -> Recipe {
        Recipe::new(name, vec!["rice".to_string()], instructions)
    }

    fn names(history: &[Recipe]) -> Vec<&str> {
        history.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_new_recipe_is_prepended() {
        let history = vec![recipe("Old", "Step one")];
        let history = add_or_promote(history, recipe("New", "Step one"));
        assert_eq!(names(&history), ["New", "Old"]);
    }

    #[test]
    fn test_same_signature_yields_one_entry_at_front() {
        let history = vec![
            recipe("Dal", "Rinse the lentils well."),
            recipe("Jeera Rice", "Wash rice."),
        ];
        let mut again = recipe("Dal", "Rinse the lentils well and boil");
        again.ingredients = vec!["toor dal".to_string()];

        let history = add_or_promote(history, again);

        assert_eq!(names(&history), ["Dal", "Jeera Rice"]);
        assert_eq!(history[0].ingredients, vec!["toor dal"]);
    }

    #[test]
    fn test_promote_keeps_existing_enrichment() {
        let mut enriched = recipe("Dal", "Rinse the lentils well.");
        enriched.image_uri = Some("data:image/png;base64,AAAA".to_string());
        let history = vec![recipe("Other", "x"), enriched];

        let history = add_or_promote(history, recipe("Dal", "Rinse the lentils well."));

        assert_eq!(names(&history), ["Dal", "Other"]);
        assert!(history[0].image_uri.is_some());
    }

    #[test]
    fn test_promote_prefers_newer_enrichment() {
        let mut old = recipe("Dal", "Rinse.");
        old.image_uri = Some("old".to_string());
        let mut new = recipe("Dal", "Rinse.");
        new.image_uri = Some("new".to_string());

        let history = add_or_promote(vec![old], new);
        assert_eq!(history[0].image_uri.as_deref(), Some("new"));
    }

    #[test]
    fn test_update_enrichment_keeps_position_and_length() {
        let history = vec![recipe("A", "a"), recipe("B", "b"), recipe("C", "c")];
        let target = history[1].signature();

        let history = update_enrichment(history, &target, &EnrichmentPatch::image("img"));

        assert_eq!(names(&history), ["A", "B", "C"]);
        assert_eq!(history[1].image_uri.as_deref(), Some("img"));
        assert!(history[0].image_uri.is_none());
    }

    #[test]
    fn test_update_enrichment_without_match_is_noop() {
        let history = vec![recipe("A", "a")];
        let missing = RecipeSignature::new("Z", "z");
        let updated = update_enrichment(history.clone(), &missing, &EnrichmentPatch::image("img"));
        assert_eq!(updated, history);
    }

    #[test]
    fn test_record_generated_keeps_batch_order_on_top() {
        let history = vec![recipe("Old", "o")];
        let batch = [recipe("First", "1"), recipe("Second", "2")];
        let history = record_generated(history, &batch);
        assert_eq!(names(&history), ["First", "Second", "Old"]);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let history = vec![recipe("A", "a"), recipe("B", "b"), recipe("C", "c")];
        assert_eq!(names(&enforce_limit(history.clone(), Some(2))), ["A", "B"]);
        assert_eq!(enforce_limit(history, None).len(), 3);
    }

    #[test]
    fn test_persisted_history_round_trips() {
        let medium: Arc<dyn StorageMedium> = Arc::new(MemoryMedium::new());
        let history = RecipeHistory::on_medium(Arc::clone(&medium), Some(10));
        history.load();

        history.add_or_promote(recipe("Poha", "Soak the poha."));
        history.update_enrichment(
            &recipe("Poha", "Soak the poha.").signature(),
            EnrichmentPatch::translation(TranslatedRecipe {
                language: "Hindi".to_string(),
                name: "पोहा".to_string(),
                ingredients: vec![],
                instructions: "पोहा भिगोएं।".to_string(),
            }),
        );

        let reopened = RecipeHistory::on_medium(medium, Some(10));
        reopened.load();
        assert_eq!(reopened.len(), 1);
        let entry = reopened.get(0).unwrap();
        assert_eq!(entry.translation.unwrap().name, "पोहा");
    }

    #[test]
    fn test_wrapper_applies_limit() {
        let history = RecipeHistory::on_medium(Arc::new(MemoryMedium::new()), Some(2));
        history.load();
        for name in ["A", "B", "C"] {
            history.add_or_promote(recipe(name, name));
        }
        assert_eq!(names(&history.recipes()), ["C", "B"]);
    }
}
