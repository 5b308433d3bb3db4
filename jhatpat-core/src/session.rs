//! One user's recipe session: generate, pick, enrich, search.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::actions;
use crate::ai::AiClient;
use crate::error::ActionError;
use crate::filter::RecipeFilter;
use crate::history::RecipeHistory;
use crate::types::{DisplayLanguage, EnrichmentPatch, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short user-facing message about an operation's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Recipes from a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub recipes: Vec<Recipe>,
    pub notice: Notice,
}

/// A selected recipe after enrichment.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The recipe with whatever enrichment succeeded.
    pub recipe: Recipe,
    pub notices: Vec<Notice>,
}

impl Selection {
    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(Notice::is_error)
    }
}

/// Ties the AI client to a recipe history.
///
/// Every enrichment result is written back to history by signature, so a
/// late result for a recipe that is no longer selected still lands on the
/// right entry.
pub struct RecipeSession {
    client: Arc<dyn AiClient>,
    history: RecipeHistory,
    language: String,
    filter: Mutex<RecipeFilter>,
}

impl RecipeSession {
    pub fn new(
        client: Arc<dyn AiClient>,
        history: RecipeHistory,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            history,
            language: language.into(),
            filter: Mutex::new(RecipeFilter::new()),
        }
    }

    pub fn client(&self) -> &dyn AiClient {
        self.client.as_ref()
    }

    pub fn history(&self) -> &RecipeHistory {
        &self.history
    }

    /// Translation target language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Generate recipes for `raw_ingredients` and record them in history.
    ///
    /// On error the history is left untouched.
    pub async fn submit(&self, raw_ingredients: &str) -> Result<Submission, ActionError> {
        let recipes = actions::handle_generate_recipe(self.client(), raw_ingredients).await?;

        self.history.record_generated(&recipes);

        let notice = Notice::success(
            "Voilà! Recipes Generated!",
            format!(
                "We found {} recipe(s) for you! Select one to see details.",
                recipes.len()
            ),
        );
        Ok(Submission { recipes, notice })
    }

    /// Enrich `recipe` with an image (if it has none) and then a translation.
    ///
    /// The translation is requested after the image so it works from the
    /// freshest copy. Failures become error notices and never propagate.
    pub async fn select(&self, mut recipe: Recipe) -> Selection {
        let signature = recipe.signature();
        let mut notices = vec![Notice::success(
            "Recipe Selected!",
            format!(
                "Viewing \"{}\". Fetching image & translation...",
                recipe.name
            ),
        )];

        if recipe.image_uri.is_none() {
            match actions::handle_generate_image(self.client(), &recipe.name).await {
                Ok(data_uri) => {
                    self.history
                        .update_enrichment(&signature, EnrichmentPatch::image(data_uri.clone()));
                    recipe.image_uri = Some(data_uri);
                    notices.push(Notice::success(
                        "Image Ready!",
                        format!("An image for \"{}\" has been generated.", recipe.name),
                    ));
                }
                Err(e) => notices.push(Notice::error(
                    "Image Generation Failed",
                    format!("Could not generate an image for \"{}\". {}", recipe.name, e),
                )),
            }
        }

        let translated = recipe
            .translation
            .as_ref()
            .is_some_and(|t| t.language == self.language);

        if !translated {
            match actions::handle_translate_recipe(self.client(), &recipe, &self.language).await {
                Ok(translation) => {
                    self.history.update_enrichment(
                        &signature,
                        EnrichmentPatch::translation(translation.clone()),
                    );
                    recipe.translation = Some(translation);
                    notices.push(Notice::success(
                        "Translation Ready!",
                        format!(
                            "\"{}\" has been translated to {}.",
                            recipe.name, self.language
                        ),
                    ));
                }
                Err(e) => notices.push(Notice::error(
                    "Translation Failed",
                    format!(
                        "Could not translate \"{}\" to {}. {}",
                        recipe.name, self.language, e
                    ),
                )),
            }
        }

        Selection { recipe, notices }
    }

    /// History entries whose name or an ingredient contains `query`.
    pub fn search(&self, query: &str) -> Vec<Recipe> {
        let mut filter = self.filter.lock().unwrap_or_else(PoisonError::into_inner);
        self.history
            .store()
            .with_revision(|revision, recipes| filter.apply(revision, recipes, query).to_vec())
    }

    /// The variant of `recipe` to show for `language`.
    ///
    /// Falls back to the original text when no translation exists. The
    /// original image is kept either way.
    pub fn display(recipe: &Recipe, language: DisplayLanguage) -> Recipe {
        match language {
            DisplayLanguage::Translated => recipe.translated().unwrap_or_else(|| recipe.clone()),
            DisplayLanguage::Original => recipe.clone(),
        }
    }
}
