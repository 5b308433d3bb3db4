//! AI prompt templates.

pub mod generate_recipe;
pub mod improve_recipe;
pub mod recipe_image;
pub mod translate_recipe;

pub use generate_recipe::render_generate_recipe_prompt;
pub use improve_recipe::{render_improve_recipe_system_prompt, render_improve_recipe_user_prompt};
pub use recipe_image::render_recipe_image_prompt;
pub use translate_recipe::render_translate_recipe_prompt;
