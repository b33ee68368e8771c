use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::CategoryRepository;

// ====================== Recount Error =============================
#[derive(Debug, Clone)]
pub enum RecountRecipesError {
    CategoryNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for RecountRecipesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecountRecipesError::CategoryNotFound => write!(f, "Category not found"),
            RecountRecipesError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RecountRecipesError {}

/// Freshly recomputed counter for one category.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecountResult {
    pub category_id: Uuid,
    pub recipe_count: i64,
}

// ====================== Recount Recipes Use Case ======================
/// Recomputes the denormalized `recipe_count` from the recipes table,
/// repairing any drift the incremental bumps have accumulated. Only
/// published recipes count.
#[async_trait]
pub trait IRecountRecipesUseCase: Send + Sync {
    async fn recount_one(&self, category_id: Uuid) -> Result<RecountResult, RecountRecipesError>;

    async fn recount_all(&self) -> Result<Vec<RecountResult>, RecountRecipesError>;
}

pub struct RecountRecipesUseCase<C>
where
    C: CategoryRepository,
{
    repository: C,
}

impl<C> RecountRecipesUseCase<C>
where
    C: CategoryRepository,
{
    pub fn new(repository: C) -> Self {
        Self { repository }
    }

    async fn store_fresh_count(
        &self,
        category_id: Uuid,
    ) -> Result<RecountResult, RecountRecipesError> {
        let count = self
            .repository
            .count_published_recipes(category_id)
            .await
            .map_err(|e| RecountRecipesError::RepositoryError(e.to_string()))? as i64;

        self.repository
            .set_recipe_count(category_id, count)
            .await
            .map_err(|e| RecountRecipesError::RepositoryError(e.to_string()))?;

        Ok(RecountResult {
            category_id,
            recipe_count: count,
        })
    }
}

#[async_trait]
impl<C> IRecountRecipesUseCase for RecountRecipesUseCase<C>
where
    C: CategoryRepository,
{
    async fn recount_one(&self, category_id: Uuid) -> Result<RecountResult, RecountRecipesError> {
        let exists = self
            .repository
            .exists(category_id)
            .await
            .map_err(|e| RecountRecipesError::RepositoryError(e.to_string()))?;
        if !exists {
            return Err(RecountRecipesError::CategoryNotFound);
        }

        self.store_fresh_count(category_id).await
    }

    async fn recount_all(&self) -> Result<Vec<RecountResult>, RecountRecipesError> {
        let categories = self
            .repository
            .list_active()
            .await
            .map_err(|e| RecountRecipesError::RepositoryError(e.to_string()))?;

        let mut results = Vec::with_capacity(categories.len());
        for category in categories {
            results.push(self.store_fresh_count(category.id).await?);
        }
        Ok(results)
    }
}
