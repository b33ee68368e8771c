use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::Title).string_len(150).not_null())
                    .col(ColumnDef::new(Recipes::Description).text().not_null())
                    .col(ColumnDef::new(Recipes::Cuisine).string_len(50).null())
                    .col(
                        ColumnDef::new(Recipes::Difficulty)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Recipes::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Recipes::Visibility)
                            .string_len(20)
                            .not_null()
                            .default("public"),
                    )
                    .col(ColumnDef::new(Recipes::PrepTime).integer().not_null())
                    .col(ColumnDef::new(Recipes::CookTime).integer().not_null())
                    .col(ColumnDef::new(Recipes::TotalTime).integer().not_null())
                    .col(
                        ColumnDef::new(Recipes::Servings)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Recipes::Ingredients)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipes::Instructions)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::Dietary).json_binary().not_null())
                    .col(ColumnDef::new(Recipes::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(Recipes::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Recipes::TotalRatings)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Recipes::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Recipes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_author")
                            .from(Recipes::Table, Recipes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_category")
                            .from(Recipes::Table, Recipes::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // The public listing always filters on status + visibility
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_recipes_public_listing
                ON recipes (status, visibility, created_at DESC);
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_recipes_category
                ON recipes (category_id, status);
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_recipes_author
                ON recipes (author_id, created_at DESC);
                "#,
            )
            .await?;

        // ILIKE search over title/description
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE EXTENSION IF NOT EXISTS pg_trgm;
                CREATE INDEX idx_recipes_title_trgm
                ON recipes USING gin (title gin_trgm_ops);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_recipes_public_listing;
                DROP INDEX IF EXISTS idx_recipes_category;
                DROP INDEX IF EXISTS idx_recipes_author;
                DROP INDEX IF EXISTS idx_recipes_title_trgm;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    AuthorId,
    CategoryId,
    Title,
    Description,
    Cuisine,
    Difficulty,
    Status,
    Visibility,
    PrepTime,
    CookTime,
    TotalTime,
    Servings,
    Ingredients,
    Instructions,
    Dietary,
    Tags,
    AverageRating,
    TotalRatings,
    Views,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}
