pub mod app_state_builder;
pub mod auth_helper;
pub mod category_fixtures;
pub mod recipe_fixtures;
