pub mod create_recipe;
pub mod delete_recipe;
pub mod get_recipe;
pub mod list_recipes;
pub mod rate_recipe;
pub mod toggle_bookmark;
pub mod toggle_like;
pub mod update_recipe;
