use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::auth::adapter::outgoing::sea_orm_entity::users::{
    Column as UserColumn, Entity as UserEntity,
};
use crate::categories::adapter::outgoing::sea_orm_entity::categories::{
    Column as CategoryColumn, Entity as CategoryEntity,
};
use crate::recipes::application::domain::entities::{
    Difficulty, RecipeStatus, Visibility,
};
use crate::recipes::application::ports::outgoing::recipe_query::{
    AuthorRef, CategoryRef, PageRequest, PageResult, RecipeListFilter, RecipeQuery,
    RecipeQueryError, RecipeView, SortKey, SortSpec, Viewer,
};

use super::sea_orm_entity::recipe_bookmarks::{
    Column as BookmarkColumn, Entity as BookmarkEntity,
};
use super::sea_orm_entity::recipe_likes::{Column as LikeColumn, Entity as LikeEntity};
use super::sea_orm_entity::recipes::{
    Column as RecipeColumn, Entity as RecipeEntity, Model as RecipeModel,
};

#[derive(FromQueryResult)]
struct GroupedCountRow {
    recipe_id: Uuid,
    count: i64,
}

#[derive(Clone, Debug)]
pub struct RecipeQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl RecipeQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Everyone except admins is pinned to published+public rows — an
    /// authenticated caller gets no carve-out for their own recipes. Applied
    /// in SQL so no page of results can leak a hidden recipe.
    fn visibility_condition(viewer: &Viewer) -> Option<Condition> {
        let public = Condition::all()
            .add(RecipeColumn::Status.eq(RecipeStatus::Published.as_str()))
            .add(RecipeColumn::Visibility.eq(Visibility::Public.as_str()));

        match viewer {
            Viewer::Admin(_) => None,
            Viewer::User(_) | Viewer::Anonymous => Some(public),
        }
    }

    fn filter_condition(filter: &RecipeListFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(category) = filter.category {
            condition = condition.add(RecipeColumn::CategoryId.eq(category));
        }
        if let Some(cuisine) = &filter.cuisine {
            condition = condition.add(Expr::col(RecipeColumn::Cuisine).ilike(cuisine.clone()));
        }
        if let Some(difficulty) = filter.difficulty {
            condition = condition.add(RecipeColumn::Difficulty.eq(difficulty.as_str()));
        }
        if let Some(max_prep_time) = filter.max_prep_time {
            condition = condition.add(RecipeColumn::PrepTime.lte(max_prep_time));
        }

        if let Some(term) = &filter.search {
            let pattern = format!("%{}%", term);
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(RecipeColumn::Title).ilike(pattern.clone()))
                    .add(Expr::col(RecipeColumn::Description).ilike(pattern.clone()))
                    .add(Expr::cust_with_values("CAST(tags AS TEXT) ILIKE ?", [pattern])),
            );
        }

        if !filter.dietary.is_empty() {
            // Any-of semantics over the JSONB array
            let mut any_tag = Condition::any();
            for tag in &filter.dietary {
                any_tag = any_tag.add(Expr::cust_with_values(
                    "dietary @> CAST(? AS JSONB)",
                    [serde_json::json!([tag]).to_string()],
                ));
            }
            condition = condition.add(any_tag);
        }

        condition
    }

    fn sort_column(key: SortKey) -> RecipeColumn {
        match key {
            SortKey::CreatedAt => RecipeColumn::CreatedAt,
            SortKey::UpdatedAt => RecipeColumn::UpdatedAt,
            SortKey::Title => RecipeColumn::Title,
            SortKey::PrepTime => RecipeColumn::PrepTime,
            SortKey::TotalTime => RecipeColumn::TotalTime,
            SortKey::AverageRating => RecipeColumn::AverageRating,
            SortKey::Views => RecipeColumn::Views,
        }
    }

    fn json_to_vec<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Vec<T> {
        serde_json::from_value(value).unwrap_or_default()
    }

    async fn grouped_counts<E, C>(
        &self,
        recipe_col: C,
        count_col: C,
        recipe_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, RecipeQueryError>
    where
        E: EntityTrait<Column = C>,
        C: ColumnTrait,
    {
        let rows = E::find()
            .select_only()
            .column_as(recipe_col, "recipe_id")
            .column_as(count_col.count(), "count")
            .filter(recipe_col.is_in(recipe_ids.to_vec()))
            .group_by(recipe_col)
            .into_model::<GroupedCountRow>()
            .all(&*self.db)
            .await
            .map_err(|e| RecipeQueryError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|r| (r.recipe_id, r.count)).collect())
    }

    /// Attaches author/category references and like/bookmark counts to a
    /// page of recipe rows with one batched query per association.
    async fn hydrate(&self, models: Vec<RecipeModel>) -> Result<Vec<RecipeView>, RecipeQueryError> {
        if models.is_empty() {
            return Ok(vec![]);
        }

        let recipe_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let mut category_ids: Vec<Uuid> = models.iter().map(|m| m.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let authors: HashMap<Uuid, AuthorRef> = UserEntity::find()
            .filter(UserColumn::Id.is_in(author_ids))
            .all(&*self.db)
            .await
            .map_err(|e| RecipeQueryError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    AuthorRef {
                        id: u.id,
                        username: u.username,
                    },
                )
            })
            .collect();

        let categories: HashMap<Uuid, CategoryRef> = CategoryEntity::find()
            .filter(CategoryColumn::Id.is_in(category_ids))
            .all(&*self.db)
            .await
            .map_err(|e| RecipeQueryError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|c| {
                (
                    c.id,
                    CategoryRef {
                        id: c.id,
                        name: c.name,
                        slug: c.slug,
                    },
                )
            })
            .collect();

        let likes = self
            .grouped_counts::<LikeEntity, _>(LikeColumn::RecipeId, LikeColumn::UserId, &recipe_ids)
            .await?;
        let bookmarks = self
            .grouped_counts::<BookmarkEntity, _>(
                BookmarkColumn::RecipeId,
                BookmarkColumn::UserId,
                &recipe_ids,
            )
            .await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let likes = likes.get(&model.id).copied().unwrap_or(0);
                let bookmarks = bookmarks.get(&model.id).copied().unwrap_or(0);
                RecipeView {
                    author: authors.get(&model.author_id).cloned(),
                    category: categories.get(&model.category_id).cloned(),
                    id: model.id,
                    title: model.title,
                    description: model.description,
                    cuisine: model.cuisine,
                    difficulty: Difficulty::parse(&model.difficulty)
                        .unwrap_or(Difficulty::Medium),
                    status: RecipeStatus::parse(&model.status).unwrap_or(RecipeStatus::Draft),
                    visibility: Visibility::parse(&model.visibility)
                        .unwrap_or(Visibility::Private),
                    prep_time: model.prep_time,
                    cook_time: model.cook_time,
                    total_time: model.total_time,
                    servings: model.servings,
                    ingredients: Self::json_to_vec(model.ingredients),
                    instructions: Self::json_to_vec(model.instructions),
                    dietary: Self::json_to_vec(model.dietary),
                    tags: Self::json_to_vec(model.tags),
                    average_rating: model.average_rating,
                    total_ratings: model.total_ratings,
                    views: model.views,
                    likes,
                    bookmarks,
                    created_at: model.created_at.to_utc(),
                    updated_at: model.updated_at.to_utc(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl RecipeQuery for RecipeQueryPostgres {
    async fn list(
        &self,
        viewer: &Viewer,
        filter: &RecipeListFilter,
        sort: &[SortSpec],
        page: PageRequest,
    ) -> Result<PageResult<RecipeView>, RecipeQueryError> {
        let mut condition = Self::filter_condition(filter);
        if let Some(gate) = Self::visibility_condition(viewer) {
            condition = condition.add(gate);
        }

        let mut select = RecipeEntity::find().filter(condition);
        for spec in sort {
            let column = Self::sort_column(spec.key);
            select = if spec.descending {
                select.order_by_desc(column)
            } else {
                select.order_by_asc(column)
            };
        }

        let paginator = select.paginate(&*self.db, page.limit as u64);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| RecipeQueryError::DatabaseError(e.to_string()))?;

        let models = paginator
            .fetch_page((page.page - 1) as u64)
            .await
            .map_err(|e| RecipeQueryError::DatabaseError(e.to_string()))?;

        let items = self.hydrate(models).await?;

        Ok(PageResult { items, total })
    }

    async fn find_view(&self, recipe_id: Uuid) -> Result<Option<RecipeView>, RecipeQueryError> {
        let model = RecipeEntity::find_by_id(recipe_id)
            .one(&*self.db)
            .await
            .map_err(|e| RecipeQueryError::DatabaseError(e.to_string()))?;

        let Some(model) = model else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.into_iter().next())
    }
}
