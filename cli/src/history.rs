use anyhow::{Context, Result};
use jhatpat_core::{
    filter_recipes, AppConfig, DisplayLanguage, Notice, NoticeLevel, Recipe, RecipeSession,
};

use crate::{open_history, open_session, zero_based};

pub fn list(config: &AppConfig, query: &str) {
    let (_, history) = open_history(config);
    let recipes = history.recipes();
    let matches = filter_recipes(&recipes, query);

    if matches.is_empty() {
        if recipes.is_empty() {
            println!("No recipes yet. Try: jhatpat generate \"chicken, rice, ginger\"");
        } else {
            println!("No recipes match \"{}\"", query);
        }
        return;
    }

    for recipe in matches.iter() {
        // Number by position in the full history so `show` can use it.
        let index = recipes
            .iter()
            .position(|r| r.signature() == recipe.signature())
            .map_or(0, |i| i + 1);
        println!("{:>3}. {}{}", index, recipe.name, enrichment_marks(recipe));
    }
}

pub async fn show(
    config: &AppConfig,
    index: usize,
    language: DisplayLanguage,
    enrich: bool,
) -> Result<()> {
    let position = zero_based(index)?;

    let recipe = if enrich {
        let session = open_session(config)?;
        let recipe = session
            .history()
            .get(position)
            .with_context(|| format!("No history entry {}", index))?;
        let selection = session.select(recipe).await;
        print_notices(&selection.notices);
        selection.recipe
    } else {
        let (_, history) = open_history(config);
        history
            .get(position)
            .with_context(|| format!("No history entry {}", index))?
    };

    if language == DisplayLanguage::Translated && recipe.translation.is_none() {
        eprintln!("No translation yet; run with --enrich to fetch one.");
    }

    print_recipe(&RecipeSession::display(&recipe, language));
    Ok(())
}

fn enrichment_marks(recipe: &Recipe) -> String {
    let mut marks = String::new();
    if recipe.image_uri.is_some() {
        marks.push_str(" [image]");
    }
    if let Some(translation) = &recipe.translation {
        marks.push_str(&format!(" [{}]", translation.language));
    }
    marks
}

pub fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.name);
    println!("{}", "=".repeat(recipe.name.chars().count()));
    println!();

    if recipe.ingredients.is_empty() {
        println!("This recipe primarily uses common kitchen staples.");
    } else {
        println!("Ingredients:");
        for ingredient in &recipe.ingredients {
            println!("  - {}", ingredient);
        }
    }
    println!();

    println!("Instructions:");
    for (i, step) in recipe
        .instructions
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
    {
        println!("  {}. {}", i + 1, step);
    }

    if let Some(uri) = &recipe.image_uri {
        let kind = uri
            .split(';')
            .next()
            .and_then(|h| h.strip_prefix("data:"))
            .unwrap_or("image");
        println!();
        println!("Image: {} ({} bytes encoded)", kind, uri.len());
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => eprintln!("{}: {}", notice.title, notice.message),
            NoticeLevel::Error => eprintln!("ERROR {}: {}", notice.title, notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_show_enrichment() {
        let mut recipe = Recipe::new("Dal", vec![], "Boil.");
        assert_eq!(enrichment_marks(&recipe), "");

        recipe.image_uri = Some("data:image/png;base64,AAAA".to_string());
        recipe.translation = Some(jhatpat_core::TranslatedRecipe {
            language: "Hindi".to_string(),
            name: "दाल".to_string(),
            ingredients: vec![],
            instructions: "उबालें".to_string(),
        });
        assert_eq!(enrichment_marks(&recipe), " [image] [Hindi]");
    }
}
