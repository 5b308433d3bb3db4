//! Core library for Jhatpat: AI-generated recipes with a persistent,
//! searchable history.

pub mod actions;
pub mod ai;
pub mod config;
pub mod error;
pub mod filter;
pub mod history;
pub mod image;
pub mod session;
pub mod staples;
pub mod storage;
pub mod types;

pub use actions::{
    handle_generate_image, handle_generate_recipe, handle_improve_recipe,
    handle_translate_recipe, validate_ingredients,
};
pub use config::AppConfig;
pub use error::{ActionError, InputError, StorageError};
pub use filter::{filter_recipes, RecipeFilter};
pub use history::{RecipeHistory, DEFAULT_HISTORY_LIMIT, HISTORY_KEY};
pub use session::{Notice, NoticeLevel, RecipeSession, Selection, Submission};
pub use storage::{FileMedium, MemoryMedium, PersistentStore, StorageMedium};
pub use types::{DisplayLanguage, EnrichmentPatch, Recipe, RecipeSignature, TranslatedRecipe};
