use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::recipes::application::domain::entities::{RecipeStatus, Visibility};
use crate::recipes::application::ports::outgoing::recipe_repository::RecipeRepository;

// ====================== Toggle Error =============================
#[derive(Debug, Clone)]
pub enum ToggleLikeError {
    RecipeNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for ToggleLikeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleLikeError::RecipeNotFound => write!(f, "Recipe not found"),
            ToggleLikeError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ToggleLikeError {}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LikeSummary {
    pub liked: bool,
    pub likes: u64,
}

// ====================== Toggle Like Use Case ======================
#[async_trait]
pub trait IToggleLikeUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid, recipe_id: Uuid)
        -> Result<LikeSummary, ToggleLikeError>;
}

pub struct ToggleLikeUseCase<R>
where
    R: RecipeRepository,
{
    repository: R,
}

impl<R> ToggleLikeUseCase<R>
where
    R: RecipeRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IToggleLikeUseCase for ToggleLikeUseCase<R>
where
    R: RecipeRepository,
{
    async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<LikeSummary, ToggleLikeError> {
        let record = self
            .repository
            .fetch_record(recipe_id)
            .await
            .map_err(|e| ToggleLikeError::RepositoryError(e.to_string()))?
            .ok_or(ToggleLikeError::RecipeNotFound)?;

        let visible = record.status == RecipeStatus::Published
            && record.visibility == Visibility::Public;
        if !visible && record.author_id != user_id {
            return Err(ToggleLikeError::RecipeNotFound);
        }

        let outcome = self
            .repository
            .toggle_like(recipe_id, user_id)
            .await
            .map_err(|e| ToggleLikeError::RepositoryError(e.to_string()))?;

        Ok(LikeSummary {
            liked: outcome.active,
            likes: outcome.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::application::ports::outgoing::recipe_repository::{
        RecipeDraft, RecipeRecord, RecipeRepositoryError, RecipeUpdate, ToggleOutcome,
    };

    struct MockRepository {
        record: Option<RecipeRecord>,
        outcome: ToggleOutcome,
    }

    #[async_trait]
    impl RecipeRepository for MockRepository {
        async fn create(&self, _draft: RecipeDraft) -> Result<Uuid, RecipeRepositoryError> {
            unimplemented!()
        }
        async fn fetch_record(
            &self,
            _recipe_id: Uuid,
        ) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
            Ok(self.record.clone())
        }
        async fn apply_update(
            &self,
            _recipe_id: Uuid,
            _update: RecipeUpdate,
        ) -> Result<(), RecipeRepositoryError> {
            unimplemented!()
        }
        async fn delete(&self, _recipe_id: Uuid) -> Result<(), RecipeRepositoryError> {
            unimplemented!()
        }
        async fn increment_views(&self, _recipe_id: Uuid) -> Result<(), RecipeRepositoryError> {
            unimplemented!()
        }
        async fn upsert_rating(
            &self,
            _recipe_id: Uuid,
            _user_id: Uuid,
            _rating: i16,
            _review: Option<String>,
        ) -> Result<(), RecipeRepositoryError> {
            unimplemented!()
        }
        async fn load_rating_values(
            &self,
            _recipe_id: Uuid,
        ) -> Result<Vec<i16>, RecipeRepositoryError> {
            unimplemented!()
        }
        async fn store_rating_aggregates(
            &self,
            _recipe_id: Uuid,
            _average: f64,
            _total: i32,
        ) -> Result<(), RecipeRepositoryError> {
            unimplemented!()
        }
        async fn toggle_like(
            &self,
            _recipe_id: Uuid,
            _user_id: Uuid,
        ) -> Result<ToggleOutcome, RecipeRepositoryError> {
            Ok(self.outcome)
        }
        async fn toggle_bookmark(
            &self,
            _recipe_id: Uuid,
            _user_id: Uuid,
        ) -> Result<ToggleOutcome, RecipeRepositoryError> {
            unimplemented!()
        }
    }

    fn public_record(author_id: Uuid) -> RecipeRecord {
        RecipeRecord {
            id: Uuid::new_v4(),
            author_id,
            category_id: Uuid::new_v4(),
            status: RecipeStatus::Published,
            visibility: Visibility::Public,
        }
    }

    #[tokio::test]
    async fn test_toggle_like_reports_new_state() {
        let use_case = ToggleLikeUseCase::new(MockRepository {
            record: Some(public_record(Uuid::new_v4())),
            outcome: ToggleOutcome {
                active: true,
                total: 12,
            },
        });

        let summary = use_case
            .execute(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(
            summary,
            LikeSummary {
                liked: true,
                likes: 12
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_like_missing_recipe_is_not_found() {
        let use_case = ToggleLikeUseCase::new(MockRepository {
            record: None,
            outcome: ToggleOutcome {
                active: false,
                total: 0,
            },
        });

        let result = use_case.execute(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(ToggleLikeError::RecipeNotFound)));
    }

    #[tokio::test]
    async fn test_toggle_like_hidden_recipe_looks_missing() {
        let mut record = public_record(Uuid::new_v4());
        record.visibility = Visibility::Private;
        let use_case = ToggleLikeUseCase::new(MockRepository {
            record: Some(record),
            outcome: ToggleOutcome {
                active: true,
                total: 1,
            },
        });

        let result = use_case.execute(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(ToggleLikeError::RecipeNotFound)));
    }
}
