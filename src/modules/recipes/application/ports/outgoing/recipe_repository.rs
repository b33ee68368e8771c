use async_trait::async_trait;
use uuid::Uuid;

use crate::recipes::application::domain::entities::{
    Difficulty, Ingredient, InstructionStep, RecipeStatus, Visibility,
};

/// Everything needed to insert a new recipe. Status always starts at draft;
/// `total_time` is derived by the adapter.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub cuisine: Option<String>,
    pub difficulty: Difficulty,
    pub visibility: Visibility,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<InstructionStep>,
    pub dietary: Vec<String>,
    pub tags: Vec<String>,
}

/// Write-side snapshot for ownership checks and counter bookkeeping.
#[derive(Debug, Clone)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub status: RecipeStatus,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<RecipeStatus>,
    pub visibility: Option<Visibility>,
    pub category_id: Option<Uuid>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<InstructionStep>>,
    pub dietary: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Result of a like/bookmark toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub active: bool,
    pub total: u64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RecipeRepositoryError {
    #[error("Recipe not found")]
    RecipeNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn create(&self, draft: RecipeDraft) -> Result<Uuid, RecipeRepositoryError>;

    async fn fetch_record(
        &self,
        recipe_id: Uuid,
    ) -> Result<Option<RecipeRecord>, RecipeRepositoryError>;

    /// Applies the partial update; `total_time` is recomputed whenever prep
    /// or cook time changes.
    async fn apply_update(
        &self,
        recipe_id: Uuid,
        update: RecipeUpdate,
    ) -> Result<(), RecipeRepositoryError>;

    async fn delete(&self, recipe_id: Uuid) -> Result<(), RecipeRepositoryError>;

    async fn increment_views(&self, recipe_id: Uuid) -> Result<(), RecipeRepositoryError>;

    /// Inserts or replaces the caller's rating (one row per rater).
    async fn upsert_rating(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
        rating: i16,
        review: Option<String>,
    ) -> Result<(), RecipeRepositoryError>;

    async fn load_rating_values(&self, recipe_id: Uuid)
        -> Result<Vec<i16>, RecipeRepositoryError>;

    async fn store_rating_aggregates(
        &self,
        recipe_id: Uuid,
        average: f64,
        total: i32,
    ) -> Result<(), RecipeRepositoryError>;

    async fn toggle_like(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleOutcome, RecipeRepositoryError>;

    async fn toggle_bookmark(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleOutcome, RecipeRepositoryError>;
}
