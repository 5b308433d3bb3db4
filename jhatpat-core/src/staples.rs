//! Common kitchen staples, left out of generated ingredient lists.

/// Ingredients every kitchen is assumed to have.
pub const STAPLE_INGREDIENTS: &[&str] = &[
    "salt", "pepper", "water", "oil", "sugar", "flour", "butter", "eggs", "milk",
];

/// Exact (trimmed, case-insensitive) match against [`STAPLE_INGREDIENTS`].
///
/// "Salt" is a staple; "sea salt" and "olive oil" are not.
pub fn is_staple(ingredient: &str) -> bool {
    let normalized = ingredient.trim().to_lowercase();
    STAPLE_INGREDIENTS.contains(&normalized.as_str())
}

/// Drop staples, keeping the order of everything else.
pub fn without_staples(ingredients: Vec<String>) -> Vec<String> {
    ingredients.into_iter().filter(|i| !is_staple(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_staple() {
        assert!(is_staple("salt"));
        assert!(is_staple("  Eggs "));
        assert!(is_staple("MILK"));
        assert!(!is_staple("sea salt"));
        assert!(!is_staple("olive oil"));
        assert!(!is_staple("paneer"));
        assert!(!is_staple(""));
    }

    #[test]
    fn test_without_staples_preserves_order() {
        let ingredients = vec![
            "ginger".to_string(),
            "Salt".to_string(),
            "chicken".to_string(),
            "water".to_string(),
            "rice".to_string(),
        ];
        assert_eq!(without_staples(ingredients), vec!["ginger", "chicken", "rice"]);
    }
}
