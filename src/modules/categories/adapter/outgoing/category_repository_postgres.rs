use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use sea_orm::sea_query::Expr;
use std::sync::Arc;
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::{
    CategoryChanges, CategoryRecord, CategoryRepository, CategoryRepositoryError, NewCategory,
};
use crate::recipes::adapter::outgoing::sea_orm_entity::recipes::{
    Column as RecipeColumn, Entity as RecipeEntity,
};
use crate::recipes::application::domain::entities::RecipeStatus;

use super::sea_orm_entity::categories::{
    ActiveModel as CategoryActiveModel, Column as CategoryColumn, Entity as CategoryEntity,
    Model as CategoryModel,
};

#[derive(Clone, Debug)]
pub struct CategoryRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_record(model: CategoryModel) -> CategoryRecord {
        CategoryRecord {
            id: model.id,
            name: model.name,
            slug: model.slug,
            code: model.code,
            description: model.description,
            parent_id: model.parent_id,
            level: model.level,
            path: model.path,
            display_order: model.display_order,
            is_active: model.is_active,
            recipe_count: model.recipe_count,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }

    /// Postgres reports which unique constraint fired in the error text.
    fn map_write_error(e: sea_orm::DbErr) -> CategoryRepositoryError {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint")
        {
            if err_str.contains("code") {
                return CategoryRepositoryError::DuplicateCode;
            }
            return CategoryRepositoryError::DuplicateSlug;
        }
        CategoryRepositoryError::DatabaseError(e.to_string())
    }

    async fn find_required(
        &self,
        category_id: Uuid,
    ) -> Result<CategoryModel, CategoryRepositoryError> {
        CategoryEntity::find_by_id(category_id)
            .one(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(CategoryRepositoryError::CategoryNotFound)
    }
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryPostgres {
    async fn find_by_id(
        &self,
        category_id: Uuid,
    ) -> Result<Option<CategoryRecord>, CategoryRepositoryError> {
        let model = CategoryEntity::find_by_id(category_id)
            .one(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?;

        Ok(model.map(Self::map_to_record))
    }

    async fn exists(&self, category_id: Uuid) -> Result<bool, CategoryRepositoryError> {
        let count = CategoryEntity::find()
            .filter(CategoryColumn::Id.eq(category_id))
            .count(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    async fn insert(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoryRepositoryError> {
        let active = CategoryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(category.name),
            slug: Set(category.slug),
            code: Set(category.code),
            description: Set(category.description),
            parent_id: Set(category.parent_id),
            level: Set(category.level),
            path: Set(category.path),
            display_order: Set(category.display_order),
            is_active: Set(category.is_active),
            recipe_count: Set(0),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active.insert(&*self.db).await.map_err(Self::map_write_error)?;

        Ok(Self::map_to_record(inserted))
    }

    async fn update(
        &self,
        category_id: Uuid,
        changes: CategoryChanges,
    ) -> Result<CategoryRecord, CategoryRepositoryError> {
        let model = self.find_required(category_id).await?;

        let mut active: CategoryActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(code) = changes.code {
            active.code = Set(code);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(parent_id) = changes.parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(level) = changes.level {
            active.level = Set(level);
        }
        if let Some(path) = changes.path {
            active.path = Set(path);
        }
        if let Some(display_order) = changes.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }

        let updated = active.update(&*self.db).await.map_err(Self::map_write_error)?;

        Ok(Self::map_to_record(updated))
    }

    async fn delete(&self, category_id: Uuid) -> Result<(), CategoryRepositoryError> {
        let result = CategoryEntity::delete_by_id(category_id)
            .exec(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(CategoryRepositoryError::CategoryNotFound);
        }
        Ok(())
    }

    async fn count_children(&self, category_id: Uuid) -> Result<u64, CategoryRepositoryError> {
        CategoryEntity::find()
            .filter(CategoryColumn::ParentId.eq(category_id))
            .count(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))
    }

    async fn count_recipes(&self, category_id: Uuid) -> Result<u64, CategoryRepositoryError> {
        RecipeEntity::find()
            .filter(RecipeColumn::CategoryId.eq(category_id))
            .count(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))
    }

    async fn count_published_recipes(
        &self,
        category_id: Uuid,
    ) -> Result<u64, CategoryRepositoryError> {
        RecipeEntity::find()
            .filter(RecipeColumn::CategoryId.eq(category_id))
            .filter(RecipeColumn::Status.eq(RecipeStatus::Published.as_str()))
            .count(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))
    }

    async fn set_recipe_count(
        &self,
        category_id: Uuid,
        count: i64,
    ) -> Result<(), CategoryRepositoryError> {
        CategoryEntity::update_many()
            .col_expr(CategoryColumn::RecipeCount, Expr::value(count))
            .filter(CategoryColumn::Id.eq(category_id))
            .exec(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn adjust_recipe_count(
        &self,
        category_id: Uuid,
        delta: i64,
    ) -> Result<(), CategoryRepositoryError> {
        // Single atomic statement; no read-modify-write race.
        CategoryEntity::update_many()
            .col_expr(
                CategoryColumn::RecipeCount,
                Expr::cust_with_values("GREATEST(recipe_count + ?, 0)", [delta]),
            )
            .filter(CategoryColumn::Id.eq(category_id))
            .exec(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<CategoryRecord>, CategoryRepositoryError> {
        let models = CategoryEntity::find()
            .filter(CategoryColumn::IsActive.eq(true))
            .order_by_asc(CategoryColumn::DisplayOrder)
            .order_by_asc(CategoryColumn::Name)
            .all(&*self.db)
            .await
            .map_err(|e| CategoryRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(Self::map_to_record).collect())
    }
}
