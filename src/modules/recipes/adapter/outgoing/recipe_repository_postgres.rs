use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::recipes::application::domain::entities::{RecipeStatus, Visibility};
use crate::recipes::application::ports::outgoing::recipe_repository::{
    RecipeDraft, RecipeRecord, RecipeRepository, RecipeRepositoryError, RecipeUpdate,
    ToggleOutcome,
};

use super::sea_orm_entity::recipe_bookmarks::{
    ActiveModel as BookmarkActiveModel, Column as BookmarkColumn, Entity as BookmarkEntity,
};
use super::sea_orm_entity::recipe_likes::{
    ActiveModel as LikeActiveModel, Column as LikeColumn, Entity as LikeEntity,
};
use super::sea_orm_entity::recipe_ratings::{
    ActiveModel as RatingActiveModel, Column as RatingColumn, Entity as RatingEntity,
};
use super::sea_orm_entity::recipes::{
    ActiveModel as RecipeActiveModel, Column as RecipeColumn, Entity as RecipeEntity,
    Model as RecipeModel,
};

#[derive(Clone, Debug)]
pub struct RecipeRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl RecipeRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, RecipeRepositoryError> {
        serde_json::to_value(value)
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))
    }

    fn map_to_record(model: RecipeModel) -> RecipeRecord {
        RecipeRecord {
            id: model.id,
            author_id: model.author_id,
            category_id: model.category_id,
            status: RecipeStatus::parse(&model.status).unwrap_or(RecipeStatus::Draft),
            visibility: Visibility::parse(&model.visibility).unwrap_or(Visibility::Private),
        }
    }

    async fn find_required(&self, recipe_id: Uuid) -> Result<RecipeModel, RecipeRepositoryError> {
        RecipeEntity::find_by_id(recipe_id)
            .one(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(RecipeRepositoryError::RecipeNotFound)
    }

    async fn count_marks<E, C>(&self, recipe_col: C, recipe_id: Uuid) -> Result<u64, RecipeRepositoryError>
    where
        E: EntityTrait<Column = C>,
        E::Model: Send + Sync + 'static,
        C: ColumnTrait,
    {
        E::find()
            .filter(recipe_col.eq(recipe_id))
            .count(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl RecipeRepository for RecipeRepositoryPostgres {
    async fn create(&self, draft: RecipeDraft) -> Result<Uuid, RecipeRepositoryError> {
        let active = RecipeActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(draft.author_id),
            category_id: Set(draft.category_id),
            title: Set(draft.title),
            description: Set(draft.description),
            cuisine: Set(draft.cuisine),
            difficulty: Set(draft.difficulty.as_str().to_string()),
            status: Set(RecipeStatus::Draft.as_str().to_string()),
            visibility: Set(draft.visibility.as_str().to_string()),
            prep_time: Set(draft.prep_time),
            cook_time: Set(draft.cook_time),
            total_time: Set(draft.prep_time + draft.cook_time),
            servings: Set(draft.servings),
            ingredients: Set(Self::to_json(&draft.ingredients)?),
            instructions: Set(Self::to_json(&draft.instructions)?),
            dietary: Set(Self::to_json(&draft.dietary)?),
            tags: Set(Self::to_json(&draft.tags)?),
            average_rating: Set(0.0),
            total_ratings: Set(0),
            views: Set(0),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active
            .insert(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        Ok(inserted.id)
    }

    async fn fetch_record(
        &self,
        recipe_id: Uuid,
    ) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
        let model = RecipeEntity::find_by_id(recipe_id)
            .one(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        Ok(model.map(Self::map_to_record))
    }

    async fn apply_update(
        &self,
        recipe_id: Uuid,
        update: RecipeUpdate,
    ) -> Result<(), RecipeRepositoryError> {
        let model = self.find_required(recipe_id).await?;

        // total_time follows its inputs
        let prep_time = update.prep_time.unwrap_or(model.prep_time);
        let cook_time = update.cook_time.unwrap_or(model.cook_time);
        let time_changed = update.prep_time.is_some() || update.cook_time.is_some();

        let mut active: RecipeActiveModel = model.into();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(cuisine) = update.cuisine {
            active.cuisine = Set(Some(cuisine));
        }
        if let Some(difficulty) = update.difficulty {
            active.difficulty = Set(difficulty.as_str().to_string());
        }
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(visibility) = update.visibility {
            active.visibility = Set(visibility.as_str().to_string());
        }
        if let Some(category_id) = update.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(prep) = update.prep_time {
            active.prep_time = Set(prep);
        }
        if let Some(cook) = update.cook_time {
            active.cook_time = Set(cook);
        }
        if time_changed {
            active.total_time = Set(prep_time + cook_time);
        }
        if let Some(servings) = update.servings {
            active.servings = Set(servings);
        }
        if let Some(ingredients) = update.ingredients {
            active.ingredients = Set(Self::to_json(&ingredients)?);
        }
        if let Some(instructions) = update.instructions {
            active.instructions = Set(Self::to_json(&instructions)?);
        }
        if let Some(dietary) = update.dietary {
            active.dietary = Set(Self::to_json(&dietary)?);
        }
        if let Some(tags) = update.tags {
            active.tags = Set(Self::to_json(&tags)?);
        }

        active
            .update(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, recipe_id: Uuid) -> Result<(), RecipeRepositoryError> {
        let result = RecipeEntity::delete_by_id(recipe_id)
            .exec(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RecipeRepositoryError::RecipeNotFound);
        }
        Ok(())
    }

    async fn increment_views(&self, recipe_id: Uuid) -> Result<(), RecipeRepositoryError> {
        // Single atomic statement; concurrent reads never lose a bump.
        RecipeEntity::update_many()
            .col_expr(
                RecipeColumn::Views,
                Expr::col(RecipeColumn::Views).add(1),
            )
            .filter(RecipeColumn::Id.eq(recipe_id))
            .exec(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn upsert_rating(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
        rating: i16,
        review: Option<String>,
    ) -> Result<(), RecipeRepositoryError> {
        let existing = RatingEntity::find()
            .filter(RatingColumn::RecipeId.eq(recipe_id))
            .filter(RatingColumn::UserId.eq(user_id))
            .one(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        match existing {
            Some(model) => {
                let mut active: RatingActiveModel = model.into();
                active.rating = Set(rating);
                active.review = Set(review);

                active
                    .update(&*self.db)
                    .await
                    .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;
            }
            None => {
                let active = RatingActiveModel {
                    id: Set(Uuid::new_v4()),
                    recipe_id: Set(recipe_id),
                    user_id: Set(user_id),
                    rating: Set(rating),
                    review: Set(review),
                    created_at: NotSet,
                    updated_at: NotSet,
                };

                active
                    .insert(&*self.db)
                    .await
                    .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;
            }
        }

        Ok(())
    }

    async fn load_rating_values(
        &self,
        recipe_id: Uuid,
    ) -> Result<Vec<i16>, RecipeRepositoryError> {
        RatingEntity::find()
            .select_only()
            .column(RatingColumn::Rating)
            .filter(RatingColumn::RecipeId.eq(recipe_id))
            .into_tuple()
            .all(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))
    }

    async fn store_rating_aggregates(
        &self,
        recipe_id: Uuid,
        average: f64,
        total: i32,
    ) -> Result<(), RecipeRepositoryError> {
        RecipeEntity::update_many()
            .col_expr(RecipeColumn::AverageRating, Expr::value(average))
            .col_expr(RecipeColumn::TotalRatings, Expr::value(total))
            .filter(RecipeColumn::Id.eq(recipe_id))
            .exec(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn toggle_like(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleOutcome, RecipeRepositoryError> {
        let existing = LikeEntity::find_by_id((recipe_id, user_id))
            .one(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        let active = match existing {
            Some(model) => {
                model
                    .delete(&*self.db)
                    .await
                    .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;
                false
            }
            None => {
                let mark = LikeActiveModel {
                    recipe_id: Set(recipe_id),
                    user_id: Set(user_id),
                    created_at: NotSet,
                };
                mark.insert(&*self.db)
                    .await
                    .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;
                true
            }
        };

        let total = self
            .count_marks::<LikeEntity, _>(LikeColumn::RecipeId, recipe_id)
            .await?;

        Ok(ToggleOutcome { active, total })
    }

    async fn toggle_bookmark(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleOutcome, RecipeRepositoryError> {
        let existing = BookmarkEntity::find_by_id((recipe_id, user_id))
            .one(&*self.db)
            .await
            .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;

        let active = match existing {
            Some(model) => {
                model
                    .delete(&*self.db)
                    .await
                    .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;
                false
            }
            None => {
                let mark = BookmarkActiveModel {
                    recipe_id: Set(recipe_id),
                    user_id: Set(user_id),
                    created_at: NotSet,
                };
                mark.insert(&*self.db)
                    .await
                    .map_err(|e| RecipeRepositoryError::DatabaseError(e.to_string()))?;
                true
            }
        };

        let total = self
            .count_marks::<BookmarkEntity, _>(BookmarkColumn::RecipeId, recipe_id)
            .await?;

        Ok(ToggleOutcome { active, total })
    }
}
