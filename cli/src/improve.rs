use anyhow::{Context, Result};
use jhatpat_core::actions::recipe_to_text;
use jhatpat_core::{handle_improve_recipe, AppConfig};

use crate::{open_session, zero_based};

pub async fn improve(config: &AppConfig, index: usize, request: &str) -> Result<()> {
    let session = open_session(config)?;
    let recipe = session
        .history()
        .get(zero_based(index)?)
        .with_context(|| format!("No history entry {}", index))?;

    let improved = handle_improve_recipe(session.client(), &recipe_to_text(&recipe), request)
        .await
        .context("Failed to improve recipe")?;

    println!("{}", improved);
    Ok(())
}
