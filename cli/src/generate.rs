use anyhow::{Context, Result};
use jhatpat_core::{ActionError, AppConfig};

use crate::history::{print_notices, print_recipe};
use crate::{open_session, zero_based};

pub async fn generate(config: &AppConfig, ingredients: &str, select: Option<usize>) -> Result<()> {
    let session = open_session(config)?;

    let submission = match session.submit(ingredients).await {
        Ok(s) => s,
        Err(ActionError::InvalidInput(e)) => anyhow::bail!("ingredients: {}", e),
        Err(e) => {
            return Err(e).context("Oops! Recipe Generation Failed.");
        }
    };

    eprintln!("{}: {}", submission.notice.title, submission.notice.message);
    for (i, recipe) in submission.recipes.iter().enumerate() {
        println!("{:>3}. {}", i + 1, recipe.name);
    }

    if let Some(n) = select {
        let recipe = submission
            .recipes
            .get(zero_based(n)?)
            .cloned()
            .with_context(|| {
                format!(
                    "Only {} recipe(s) were generated",
                    submission.recipes.len()
                )
            })?;

        let selection = session.select(recipe).await;
        print_notices(&selection.notices);
        println!();
        print_recipe(&selection.recipe);
    }

    Ok(())
}
