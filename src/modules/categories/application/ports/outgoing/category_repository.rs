use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub code: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub level: i16,
    pub path: String,
    pub display_order: i32,
    pub is_active: bool,
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub code: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub level: i16,
    pub path: String,
    pub display_order: i32,
    pub is_active: bool,
}

/// Partial update. `parent_id` is doubly optional: `None` = leave alone,
/// `Some(None)` = detach to root.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub description: Option<Option<String>>,
    pub parent_id: Option<Option<Uuid>>,
    pub level: Option<i16>,
    pub path: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CategoryRepositoryError {
    #[error("Slug is already in use")]
    DuplicateSlug,

    #[error("Code is already in use")]
    DuplicateCode,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(
        &self,
        category_id: Uuid,
    ) -> Result<Option<CategoryRecord>, CategoryRepositoryError>;

    async fn exists(&self, category_id: Uuid) -> Result<bool, CategoryRepositoryError>;

    async fn insert(&self, category: NewCategory)
        -> Result<CategoryRecord, CategoryRepositoryError>;

    async fn update(
        &self,
        category_id: Uuid,
        changes: CategoryChanges,
    ) -> Result<CategoryRecord, CategoryRepositoryError>;

    async fn delete(&self, category_id: Uuid) -> Result<(), CategoryRepositoryError>;

    async fn count_children(&self, category_id: Uuid) -> Result<u64, CategoryRepositoryError>;

    /// Recipes referencing the category, any status.
    async fn count_recipes(&self, category_id: Uuid) -> Result<u64, CategoryRepositoryError>;

    /// Published recipes only; the figure the recount operation stores.
    async fn count_published_recipes(
        &self,
        category_id: Uuid,
    ) -> Result<u64, CategoryRepositoryError>;

    async fn set_recipe_count(
        &self,
        category_id: Uuid,
        count: i64,
    ) -> Result<(), CategoryRepositoryError>;

    /// Relative counter bump used by recipe create/delete/move.
    async fn adjust_recipe_count(
        &self,
        category_id: Uuid,
        delta: i64,
    ) -> Result<(), CategoryRepositoryError>;

    async fn list_active(&self) -> Result<Vec<CategoryRecord>, CategoryRepositoryError>;
}
