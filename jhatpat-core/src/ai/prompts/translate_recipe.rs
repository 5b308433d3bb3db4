//! Recipe translation prompt.

/// Prompt name for cache keys.
pub const TRANSLATE_RECIPE_PROMPT_NAME: &str = "translate_recipe";

/// Render the translation prompt for a recipe.
pub fn render_translate_recipe_prompt(
    language: &str,
    name: &str,
    ingredients: &[String],
    instructions: &str,
) -> String {
    let ingredient_lines: String = ingredients
        .iter()
        .map(|i| format!("- {}\n", i))
        .collect();

    format!(
        r#"You are an expert translator specializing in translating culinary content from English to {language}.
Translate the following recipe details accurately and naturally into {language}.

Recipe Name (English): {name}
Ingredients (English):
{ingredient_lines}Instructions (English):
{instructions}

Keep the ingredients as a list with the same number of items, and keep the instructions one step per line.
Respond with JSON only, no other text:
{{"recipeName": "string", "ingredients": ["string"], "instructions": "string"}}"#,
        language = language,
        name = name,
        ingredient_lines = ingredient_lines,
        instructions = instructions
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_translate_recipe_prompt(
            "Hindi",
            "Aloo Gobi",
            &["potato".to_string(), "cauliflower".to_string()],
            "Chop.\nFry.",
        );
        assert!(prompt.contains("into Hindi"));
        assert!(prompt.contains("- potato\n- cauliflower\n"));
        assert!(prompt.contains("Chop.\nFry."));
    }
}
