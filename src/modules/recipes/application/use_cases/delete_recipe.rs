use async_trait::async_trait;
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::CategoryRepository;
use crate::recipes::application::ports::outgoing::recipe_query::Viewer;
use crate::recipes::application::ports::outgoing::recipe_repository::RecipeRepository;

// ====================== Delete Error =============================
#[derive(Debug, Clone)]
pub enum DeleteRecipeError {
    RecipeNotFound,
    NotOwner,
    RepositoryError(String),
}

impl std::fmt::Display for DeleteRecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteRecipeError::RecipeNotFound => write!(f, "Recipe not found"),
            DeleteRecipeError::NotOwner => {
                write!(f, "Only the author or an administrator may delete this recipe")
            }
            DeleteRecipeError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteRecipeError {}

// ====================== Delete Recipe Use Case ======================
#[async_trait]
pub trait IDeleteRecipeUseCase: Send + Sync {
    async fn execute(&self, actor: Viewer, recipe_id: Uuid) -> Result<(), DeleteRecipeError>;
}

pub struct DeleteRecipeUseCase<R, C>
where
    R: RecipeRepository,
    C: CategoryRepository,
{
    repository: R,
    categories: C,
}

impl<R, C> DeleteRecipeUseCase<R, C>
where
    R: RecipeRepository,
    C: CategoryRepository,
{
    pub fn new(repository: R, categories: C) -> Self {
        Self {
            repository,
            categories,
        }
    }
}

#[async_trait]
impl<R, C> IDeleteRecipeUseCase for DeleteRecipeUseCase<R, C>
where
    R: RecipeRepository,
    C: CategoryRepository,
{
    async fn execute(&self, actor: Viewer, recipe_id: Uuid) -> Result<(), DeleteRecipeError> {
        let record = self
            .repository
            .fetch_record(recipe_id)
            .await
            .map_err(|e| DeleteRecipeError::RepositoryError(e.to_string()))?
            .ok_or(DeleteRecipeError::RecipeNotFound)?;

        let is_author = actor.user_id() == Some(record.author_id);
        if !is_author && !actor.is_admin() {
            return Err(DeleteRecipeError::NotOwner);
        }

        self.repository
            .delete(recipe_id)
            .await
            .map_err(|e| DeleteRecipeError::RepositoryError(e.to_string()))?;

        // Counter drift here is repaired by the category recount operation.
        if let Err(e) = self
            .categories
            .adjust_recipe_count(record.category_id, -1)
            .await
        {
            tracing::warn!(
                "Failed to decrement recipe count for category {}: {}",
                record.category_id,
                e
            );
        }

        Ok(())
    }
}
