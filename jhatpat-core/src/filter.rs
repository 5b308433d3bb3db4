//! Free-text search over the recipe history.

use std::borrow::Cow;

use crate::types::Recipe;

/// Whether `recipe`'s name or any ingredient contains the lowercased query.
fn matches(recipe: &Recipe, lowercase_query: &str) -> bool {
    recipe.name.to_lowercase().contains(lowercase_query)
        || recipe
            .ingredients
            .iter()
            .any(|i| i.to_lowercase().contains(lowercase_query))
}

/// Recipes whose name or an ingredient contains `query`, ignoring case.
///
/// An empty query borrows the whole collection.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], query: &str) -> Cow<'a, [Recipe]> {
    if query.is_empty() {
        return Cow::Borrowed(recipes);
    }

    let query = query.to_lowercase();
    Cow::Owned(
        recipes
            .iter()
            .filter(|r| matches(r, &query))
            .cloned()
            .collect(),
    )
}

/// Memoized [`filter_recipes`], keyed on the collection revision and query.
#[derive(Debug, Default)]
pub struct RecipeFilter {
    key: Option<(u64, String)>,
    result: Vec<Recipe>,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `recipes`, reusing the previous result when neither the
    /// revision nor the query changed.
    pub fn apply(&mut self, revision: u64, recipes: &[Recipe], query: &str) -> &[Recipe] {
        let fresh = matches!(&self.key, Some((rev, q)) if *rev == revision && q == query);
        if !fresh {
            self.result = filter_recipes(recipes, query).into_owned();
            self.key = Some((revision, query.to_string()));
        }
        &self.result
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> Vec<Recipe> {
        vec![
            Recipe::new(
                "Aloo Gobi",
                vec!["potato".into(), "cauliflower".into()],
                "Chop.\nFry.",
            ),
            Recipe::new(
                "Ginger Chicken Rice",
                vec!["chicken".into(), "rice".into(), "ginger".into()],
                "Step1\nStep2",
            ),
            Recipe::new("Masala Chai", vec![], "Boil."),
        ]
    }

    #[test]
    fn test_empty_query_returns_collection() {
        let recipes = collection();
        let result = filter_recipes(&recipes, "");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), recipes.as_slice());
    }

    #[test]
    fn test_case_insensitive_on_name() {
        let recipes = collection();
        let lower = filter_recipes(&recipes, "aloo");
        let upper = filter_recipes(&recipes, "ALOO");
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 1);
        assert_eq!(lower[0].name, "Aloo Gobi");
    }

    #[test]
    fn test_matches_any_ingredient() {
        let recipes = collection();
        let result = filter_recipes(&recipes, "Cauli");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Aloo Gobi");
    }

    #[test]
    fn test_keeps_collection_order() {
        let recipes = collection();
        let result = filter_recipes(&recipes, "i");
        let names: Vec<_> = result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Aloo Gobi", "Ginger Chicken Rice", "Masala Chai"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(filter_recipes(&collection(), "paneer").is_empty());
    }

    #[test]
    fn test_memo_recomputes_on_revision_or_query_change() {
        let mut recipes = collection();
        let mut filter = RecipeFilter::new();

        assert_eq!(filter.apply(1, &recipes, "rice").len(), 1);

        // Same revision and query: the cached result is reused even if the
        // caller passes a different slice.
        recipes.push(Recipe::new("Lemon Rice", vec![], "Temper."));
        assert_eq!(filter.apply(1, &recipes, "rice").len(), 1);

        assert_eq!(filter.apply(2, &recipes, "rice").len(), 2);
        assert_eq!(filter.apply(2, &recipes, "chai").len(), 1);
    }
}
