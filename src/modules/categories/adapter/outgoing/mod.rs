pub mod category_repository_postgres;
pub mod sea_orm_entity;

pub use category_repository_postgres::CategoryRepositoryPostgres;
