pub mod recipe_query;
pub mod recipe_repository;

pub use recipe_query::{
    AuthorRef, CategoryRef, PageRequest, PageResult, RecipeListFilter, RecipeQuery,
    RecipeQueryError, RecipeView, SortKey, SortSpec, Viewer,
};
pub use recipe_repository::{
    RecipeDraft, RecipeRecord, RecipeRepository, RecipeRepositoryError, RecipeUpdate,
    ToggleOutcome,
};
