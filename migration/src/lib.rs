pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_users_table;
mod m20250110_000002_create_categories_table;
mod m20250110_000003_create_recipes_table;
mod m20250110_000004_create_recipe_feedback_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_users_table::Migration),
            Box::new(m20250110_000002_create_categories_table::Migration),
            Box::new(m20250110_000003_create_recipes_table::Migration),
            Box::new(m20250110_000004_create_recipe_feedback_tables::Migration),
        ]
    }
}
