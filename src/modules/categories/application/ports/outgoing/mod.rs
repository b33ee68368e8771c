pub mod category_repository;

pub use category_repository::{
    CategoryChanges, CategoryRecord, CategoryRepository, CategoryRepositoryError, NewCategory,
};
