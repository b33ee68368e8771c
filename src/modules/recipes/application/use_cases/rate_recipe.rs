use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::recipes::application::domain::entities::{
    average_rating, RecipeStatus, Visibility,
};
use crate::recipes::application::ports::outgoing::recipe_repository::RecipeRepository;

const REVIEW_MAX: usize = 1000;

// ========================= Rate Recipe Request =========================
#[derive(Debug, Clone)]
pub struct RateRecipeRequest {
    rating: i16,
    review: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RateRecipeRequestError {
    RatingOutOfRange,
    ReviewTooLong,
}

impl std::fmt::Display for RateRecipeRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateRecipeRequestError::RatingOutOfRange => {
                write!(f, "Rating must be an integer between 1 and 5")
            }
            RateRecipeRequestError::ReviewTooLong => {
                write!(f, "Review must be at most {} characters", REVIEW_MAX)
            }
        }
    }
}

impl std::error::Error for RateRecipeRequestError {}

impl RateRecipeRequest {
    pub fn new(rating: i16, review: Option<String>) -> Result<Self, RateRecipeRequestError> {
        if !(1..=5).contains(&rating) {
            return Err(RateRecipeRequestError::RatingOutOfRange);
        }

        let review = review.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        if let Some(r) = &review {
            if r.chars().count() > REVIEW_MAX {
                return Err(RateRecipeRequestError::ReviewTooLong);
            }
        }

        Ok(Self { rating, review })
    }

    pub fn rating(&self) -> i16 {
        self.rating
    }

    pub fn review(&self) -> Option<&str> {
        self.review.as_deref()
    }
}

impl<'de> Deserialize<'de> for RateRecipeRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RateRecipeRequestHelper {
            rating: i16,
            review: Option<String>,
        }

        let helper = RateRecipeRequestHelper::deserialize(deserializer)?;
        RateRecipeRequest::new(helper.rating, helper.review).map_err(serde::de::Error::custom)
    }
}

// ====================== Rate Error =============================
#[derive(Debug, Clone)]
pub enum RateRecipeError {
    RecipeNotFound,
    CannotRateOwnRecipe,
    RepositoryError(String),
}

impl std::fmt::Display for RateRecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateRecipeError::RecipeNotFound => write!(f, "Recipe not found"),
            RateRecipeError::CannotRateOwnRecipe => {
                write!(f, "Authors cannot rate their own recipes")
            }
            RateRecipeError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RateRecipeError {}

/// Aggregates returned after a rating lands.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: i32,
}

// ====================== Rate Recipe Use Case ======================
#[async_trait]
pub trait IRateRecipeUseCase: Send + Sync {
    async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        request: RateRecipeRequest,
    ) -> Result<RatingSummary, RateRecipeError>;
}

pub struct RateRecipeUseCase<R>
where
    R: RecipeRepository,
{
    repository: R,
}

impl<R> RateRecipeUseCase<R>
where
    R: RecipeRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IRateRecipeUseCase for RateRecipeUseCase<R>
where
    R: RecipeRepository,
{
    async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        request: RateRecipeRequest,
    ) -> Result<RatingSummary, RateRecipeError> {
        let record = self
            .repository
            .fetch_record(recipe_id)
            .await
            .map_err(|e| RateRecipeError::RepositoryError(e.to_string()))?
            .ok_or(RateRecipeError::RecipeNotFound)?;

        if record.author_id == user_id {
            return Err(RateRecipeError::CannotRateOwnRecipe);
        }

        // Only publicly visible recipes accept ratings; hidden ones look missing.
        if record.status != RecipeStatus::Published || record.visibility != Visibility::Public {
            return Err(RateRecipeError::RecipeNotFound);
        }

        self.repository
            .upsert_rating(
                recipe_id,
                user_id,
                request.rating(),
                request.review().map(str::to_string),
            )
            .await
            .map_err(|e| RateRecipeError::RepositoryError(e.to_string()))?;

        // Recompute from the raw values so a re-rating replaces, not stacks.
        let values = self
            .repository
            .load_rating_values(recipe_id)
            .await
            .map_err(|e| RateRecipeError::RepositoryError(e.to_string()))?;

        let summary = RatingSummary {
            average_rating: average_rating(&values),
            total_ratings: values.len() as i32,
        };

        self.repository
            .store_rating_aggregates(recipe_id, summary.average_rating, summary.total_ratings)
            .await
            .map_err(|e| RateRecipeError::RepositoryError(e.to_string()))?;

        Ok(summary)
    }
}
