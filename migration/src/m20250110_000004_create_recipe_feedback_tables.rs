use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipeRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeRatings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeRatings::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(RecipeRatings::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(RecipeRatings::Rating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecipeRatings::Review).text().null())
                    .col(
                        ColumnDef::new(RecipeRatings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RecipeRatings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ratings_recipe")
                            .from(RecipeRatings::Table, RecipeRatings::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One rating per user per recipe; resubmission is an upsert
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX idx_recipe_ratings_unique_rater
                ON recipe_ratings (recipe_id, user_id);

                ALTER TABLE recipe_ratings
                ADD CONSTRAINT chk_recipe_ratings_range CHECK (rating BETWEEN 1 AND 5);
                "#,
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeLikes::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(RecipeLikes::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(RecipeLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RecipeLikes::RecipeId)
                            .col(RecipeLikes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_likes_recipe")
                            .from(RecipeLikes::Table, RecipeLikes::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeBookmarks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeBookmarks::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(RecipeBookmarks::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(RecipeBookmarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RecipeBookmarks::RecipeId)
                            .col(RecipeBookmarks::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_bookmarks_recipe")
                            .from(RecipeBookmarks::Table, RecipeBookmarks::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeBookmarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeRatings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RecipeRatings {
    Table,
    Id,
    RecipeId,
    UserId,
    Rating,
    Review,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RecipeLikes {
    Table,
    RecipeId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RecipeBookmarks {
    Table,
    RecipeId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
}
