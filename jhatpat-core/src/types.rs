use serde::{Deserialize, Serialize};

/// Number of instruction characters that take part in a recipe's signature.
pub const SIGNATURE_INSTRUCTIONS_LEN: usize = 20;

/// A generated recipe, as shown to the user and kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(alias = "recipeName")]
    pub name: String,
    /// Non-staple ingredients. May be empty.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Newline-separated steps.
    pub instructions: String,
    /// `data:image/...;base64,...` payload, once generated.
    #[serde(
        default,
        alias = "imageDataUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslatedRecipe>,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        ingredients: Vec<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients,
            instructions: instructions.into(),
            image_uri: None,
            translation: None,
        }
    }

    /// Identity used to deduplicate history entries.
    pub fn signature(&self) -> RecipeSignature {
        RecipeSignature::new(&self.name, &self.instructions)
    }

    /// Copy of this recipe with text replaced by its translation, if any.
    ///
    /// The image is kept from the original recipe.
    pub fn translated(&self) -> Option<Recipe> {
        self.translation.as_ref().map(|t| Recipe {
            name: t.name.clone(),
            ingredients: t.ingredients.clone(),
            instructions: t.instructions.clone(),
            image_uri: self.image_uri.clone(),
            translation: None,
        })
    }
}

/// The text of a recipe in a second language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TranslatedRecipe {
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// (name, first 20 characters of instructions).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeSignature {
    pub name: String,
    pub instructions_prefix: String,
}

impl RecipeSignature {
    pub fn new(name: &str, instructions: &str) -> Self {
        Self {
            name: name.to_string(),
            instructions_prefix: instructions
                .chars()
                .take(SIGNATURE_INSTRUCTIONS_LEN)
                .collect(),
        }
    }
}

impl std::fmt::Display for RecipeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.instructions_prefix)
    }
}

/// Enrichment data that arrives after a recipe was first recorded.
///
/// Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentPatch {
    pub image_uri: Option<String>,
    pub translation: Option<TranslatedRecipe>,
}

impl EnrichmentPatch {
    pub fn image(image_uri: impl Into<String>) -> Self {
        Self {
            image_uri: Some(image_uri.into()),
            translation: None,
        }
    }

    pub fn translation(translation: TranslatedRecipe) -> Self {
        Self {
            image_uri: None,
            translation: Some(translation),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image_uri.is_none() && self.translation.is_none()
    }

    /// Merge the carried fields into `recipe`.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(image_uri) = &self.image_uri {
            recipe.image_uri = Some(image_uri.clone());
        }
        if let Some(translation) = &self.translation {
            recipe.translation = Some(translation.clone());
        }
    }
}

/// Which text variant of a recipe to display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DisplayLanguage {
    #[default]
    Original,
    Translated,
}
