pub mod recipe_bookmarks;
pub mod recipe_likes;
pub mod recipe_ratings;
pub mod recipes;
