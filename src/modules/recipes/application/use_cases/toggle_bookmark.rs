use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::recipes::application::domain::entities::{RecipeStatus, Visibility};
use crate::recipes::application::ports::outgoing::recipe_repository::RecipeRepository;

// ====================== Toggle Error =============================
#[derive(Debug, Clone)]
pub enum ToggleBookmarkError {
    RecipeNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for ToggleBookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleBookmarkError::RecipeNotFound => write!(f, "Recipe not found"),
            ToggleBookmarkError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ToggleBookmarkError {}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookmarkSummary {
    pub bookmarked: bool,
    pub bookmarks: u64,
}

// ====================== Toggle Bookmark Use Case ======================
#[async_trait]
pub trait IToggleBookmarkUseCase: Send + Sync {
    async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<BookmarkSummary, ToggleBookmarkError>;
}

pub struct ToggleBookmarkUseCase<R>
where
    R: RecipeRepository,
{
    repository: R,
}

impl<R> ToggleBookmarkUseCase<R>
where
    R: RecipeRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IToggleBookmarkUseCase for ToggleBookmarkUseCase<R>
where
    R: RecipeRepository,
{
    async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<BookmarkSummary, ToggleBookmarkError> {
        let record = self
            .repository
            .fetch_record(recipe_id)
            .await
            .map_err(|e| ToggleBookmarkError::RepositoryError(e.to_string()))?
            .ok_or(ToggleBookmarkError::RecipeNotFound)?;

        let visible = record.status == RecipeStatus::Published
            && record.visibility == Visibility::Public;
        if !visible && record.author_id != user_id {
            return Err(ToggleBookmarkError::RecipeNotFound);
        }

        let outcome = self
            .repository
            .toggle_bookmark(recipe_id, user_id)
            .await
            .map_err(|e| ToggleBookmarkError::RepositoryError(e.to_string()))?;

        Ok(BookmarkSummary {
            bookmarked: outcome.active,
            bookmarks: outcome.total,
        })
    }
}
