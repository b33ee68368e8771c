pub mod create_category;
pub mod delete_category;
pub mod get_category_tree;
pub mod recount_recipes;
pub mod update_category;
