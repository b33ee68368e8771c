mod create_category;
mod delete_category;
mod get_category_tree;
mod recount_recipes;
mod update_category;

pub use create_category::create_category_handler;
pub use delete_category::delete_category_handler;
pub use get_category_tree::get_category_tree_handler;
pub use recount_recipes::{recount_all_categories_handler, recount_category_handler};
pub use update_category::update_category_handler;
