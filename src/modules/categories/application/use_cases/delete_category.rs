use async_trait::async_trait;
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::{
    CategoryRepository, CategoryRepositoryError,
};

// ====================== Delete Category Error =============================
#[derive(Debug, Clone)]
pub enum DeleteCategoryError {
    CategoryNotFound,
    HasChildren(u64),
    HasRecipes(u64),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteCategoryError::CategoryNotFound => write!(f, "Category not found"),
            DeleteCategoryError::HasChildren(count) => {
                write!(f, "Category still has {} subcategories", count)
            }
            DeleteCategoryError::HasRecipes(count) => {
                write!(f, "Category still has {} recipes", count)
            }
            DeleteCategoryError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteCategoryError {}

// ====================== Delete Category Use Case ======================
#[async_trait]
pub trait IDeleteCategoryUseCase: Send + Sync {
    async fn execute(&self, category_id: Uuid) -> Result<(), DeleteCategoryError>;
}

pub struct DeleteCategoryUseCase<C>
where
    C: CategoryRepository,
{
    repository: C,
}

impl<C> DeleteCategoryUseCase<C>
where
    C: CategoryRepository,
{
    pub fn new(repository: C) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<C> IDeleteCategoryUseCase for DeleteCategoryUseCase<C>
where
    C: CategoryRepository,
{
    async fn execute(&self, category_id: Uuid) -> Result<(), DeleteCategoryError> {
        let exists = self
            .repository
            .exists(category_id)
            .await
            .map_err(|e| DeleteCategoryError::RepositoryError(e.to_string()))?;
        if !exists {
            return Err(DeleteCategoryError::CategoryNotFound);
        }

        let children = self
            .repository
            .count_children(category_id)
            .await
            .map_err(|e| DeleteCategoryError::RepositoryError(e.to_string()))?;
        if children > 0 {
            return Err(DeleteCategoryError::HasChildren(children));
        }

        // Recipes of any status block deletion, drafts included.
        let recipes = self
            .repository
            .count_recipes(category_id)
            .await
            .map_err(|e| DeleteCategoryError::RepositoryError(e.to_string()))?;
        if recipes > 0 {
            return Err(DeleteCategoryError::HasRecipes(recipes));
        }

        self.repository
            .delete(category_id)
            .await
            .map_err(|e| match e {
                CategoryRepositoryError::CategoryNotFound => {
                    DeleteCategoryError::CategoryNotFound
                }
                other => DeleteCategoryError::RepositoryError(other.to_string()),
            })
    }
}
