use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::categories::application::domain::entities::TREE_DEPTH;
use crate::categories::application::ports::outgoing::category_repository::{
    CategoryRecord, CategoryRepository,
};

// ====================== Tree Error =============================
#[derive(Debug, Clone)]
pub enum GetCategoryTreeError {
    RepositoryError(String),
}

impl std::fmt::Display for GetCategoryTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetCategoryTreeError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for GetCategoryTreeError {}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTreeNode {
    #[serde(flatten)]
    pub category: CategoryRecord,
    pub children: Vec<CategoryTreeNode>,
}

// ====================== Get Category Tree Use Case ======================
#[async_trait]
pub trait IGetCategoryTreeUseCase: Send + Sync {
    async fn execute(&self) -> Result<Vec<CategoryTreeNode>, GetCategoryTreeError>;
}

pub struct GetCategoryTreeUseCase<C>
where
    C: CategoryRepository,
{
    repository: C,
}

impl<C> GetCategoryTreeUseCase<C>
where
    C: CategoryRepository,
{
    pub fn new(repository: C) -> Self {
        Self { repository }
    }
}

/// Assembles one tree level, recursing up to `depth_left` levels below it.
fn build_level(
    parent_id: Option<Uuid>,
    by_parent: &std::collections::HashMap<Option<Uuid>, Vec<CategoryRecord>>,
    depth_left: usize,
) -> Vec<CategoryTreeNode> {
    if depth_left == 0 {
        return vec![];
    }

    let Some(records) = by_parent.get(&parent_id) else {
        return vec![];
    };

    records
        .iter()
        .map(|record| CategoryTreeNode {
            children: build_level(Some(record.id), by_parent, depth_left - 1),
            category: record.clone(),
        })
        .collect()
}

#[async_trait]
impl<C> IGetCategoryTreeUseCase for GetCategoryTreeUseCase<C>
where
    C: CategoryRepository,
{
    async fn execute(&self) -> Result<Vec<CategoryTreeNode>, GetCategoryTreeError> {
        let mut records = self
            .repository
            .list_active()
            .await
            .map_err(|e| GetCategoryTreeError::RepositoryError(e.to_string()))?;

        records.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut by_parent: std::collections::HashMap<Option<Uuid>, Vec<CategoryRecord>> =
            std::collections::HashMap::new();
        for record in records {
            by_parent.entry(record.parent_id).or_default().push(record);
        }

        // roots consume one unit of depth, so serving levels 0..=TREE_DEPTH
        // takes TREE_DEPTH + 1
        Ok(build_level(None, &by_parent, TREE_DEPTH + 1))
    }
}
