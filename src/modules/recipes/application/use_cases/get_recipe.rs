use async_trait::async_trait;
use uuid::Uuid;

use crate::recipes::application::ports::outgoing::recipe_query::{RecipeQuery, RecipeView, Viewer};
use crate::recipes::application::ports::outgoing::recipe_repository::RecipeRepository;

// ====================== Get Error =============================
#[derive(Debug, Clone)]
pub enum GetRecipeError {
    RecipeNotFound,
    QueryError(String),
}

impl std::fmt::Display for GetRecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetRecipeError::RecipeNotFound => write!(f, "Recipe not found"),
            GetRecipeError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for GetRecipeError {}

// ====================== Get Recipe Use Case ======================
#[async_trait]
pub trait IGetRecipeUseCase: Send + Sync {
    async fn execute(&self, viewer: Viewer, recipe_id: Uuid)
        -> Result<RecipeView, GetRecipeError>;
}

pub struct GetRecipeUseCase<Q, R>
where
    Q: RecipeQuery,
    R: RecipeRepository,
{
    query: Q,
    repository: R,
}

impl<Q, R> GetRecipeUseCase<Q, R>
where
    Q: RecipeQuery,
    R: RecipeRepository,
{
    pub fn new(query: Q, repository: R) -> Self {
        Self { query, repository }
    }
}

#[async_trait]
impl<Q, R> IGetRecipeUseCase for GetRecipeUseCase<Q, R>
where
    Q: RecipeQuery,
    R: RecipeRepository,
{
    async fn execute(
        &self,
        viewer: Viewer,
        recipe_id: Uuid,
    ) -> Result<RecipeView, GetRecipeError> {
        let mut view = self
            .query
            .find_view(recipe_id)
            .await
            .map_err(|e| GetRecipeError::QueryError(e.to_string()))?
            .ok_or(GetRecipeError::RecipeNotFound)?;

        let author_id = view.author.as_ref().map(|a| a.id);
        let is_author = author_id.is_some() && author_id == viewer.user_id();

        // Hidden recipes look identical to missing ones.
        if !view.is_publicly_visible() && !is_author && !viewer.is_admin() {
            return Err(GetRecipeError::RecipeNotFound);
        }

        // Authors browsing their own work do not inflate the counter.
        if !is_author {
            match self.repository.increment_views(recipe_id).await {
                Ok(()) => view.views += 1,
                Err(e) => {
                    tracing::warn!("Failed to bump view count for {}: {}", recipe_id, e);
                }
            }
        }

        Ok(view)
    }
}
