use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::recipes::application::domain::entities::{
    Difficulty, Ingredient, InstructionStep, RecipeStatus, Visibility,
};

/// Caller context threaded through every read. Admins bypass the
/// published+public gate; everyone else never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
    Admin(Uuid),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) | Viewer::Admin(id) => Some(*id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Viewer::Admin(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeListFilter {
    pub search: Option<String>,
    pub category: Option<Uuid>,
    pub cuisine: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_prep_time: Option<i32>,
    pub dietary: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Title,
    PrepTime,
    TotalTime,
    AverageRating,
    Views,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "createdAt" => Some(SortKey::CreatedAt),
            "updatedAt" => Some(SortKey::UpdatedAt),
            "title" => Some(SortKey::Title),
            "prepTime" => Some(SortKey::PrepTime),
            "totalTime" => Some(SortKey::TotalTime),
            "averageRating" => Some(SortKey::AverageRating),
            "views" => Some(SortKey::Views),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl SortSpec {
    /// Parses a comma-separated sort expression (`-` prefix = descending).
    /// Unknown keys are dropped; an empty result falls back to `-createdAt`.
    pub fn parse_list(raw: &str) -> Vec<SortSpec> {
        let mut specs: Vec<SortSpec> = raw
            .split(',')
            .filter_map(|part| {
                let part = part.trim();
                let (descending, key) = match part.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, part),
                };
                SortKey::parse(key).map(|key| SortSpec { key, descending })
            })
            .collect();

        if specs.is_empty() {
            specs.push(SortSpec::default());
        }
        specs
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            key: SortKey::CreatedAt,
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1, limit: 12 }
    }
}

#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Read model of a recipe with author/category references attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author: Option<AuthorRef>,
    pub category: Option<CategoryRef>,
    pub cuisine: Option<String>,
    pub difficulty: Difficulty,
    pub status: RecipeStatus,
    pub visibility: Visibility,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub servings: i32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<InstructionStep>,
    pub dietary: Vec<String>,
    pub tags: Vec<String>,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub views: i64,
    pub likes: i64,
    pub bookmarks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeView {
    pub fn is_publicly_visible(&self) -> bool {
        self.status == RecipeStatus::Published && self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RecipeQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Lists recipes matching `filter`, constrained by the viewer's
    /// visibility gate, sorted and paginated.
    async fn list(
        &self,
        viewer: &Viewer,
        filter: &RecipeListFilter,
        sort: &[SortSpec],
        page: PageRequest,
    ) -> Result<PageResult<RecipeView>, RecipeQueryError>;

    /// Fetches one recipe regardless of visibility; the use case decides
    /// whether the viewer may see it.
    async fn find_view(&self, recipe_id: Uuid) -> Result<Option<RecipeView>, RecipeQueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_with_prefix_and_whitelist() {
        let specs = SortSpec::parse_list("-averageRating,title,bogus");

        assert_eq!(
            specs,
            vec![
                SortSpec {
                    key: SortKey::AverageRating,
                    descending: true
                },
                SortSpec {
                    key: SortKey::Title,
                    descending: false
                },
            ]
        );
    }

    #[test]
    fn test_sort_parse_falls_back_to_created_at_desc() {
        let specs = SortSpec::parse_list("nonsense");

        assert_eq!(specs, vec![SortSpec::default()]);
        assert!(specs[0].descending);
        assert_eq!(specs[0].key, SortKey::CreatedAt);
    }

    #[test]
    fn test_viewer_accessors() {
        let id = Uuid::new_v4();
        assert_eq!(Viewer::Anonymous.user_id(), None);
        assert_eq!(Viewer::User(id).user_id(), Some(id));
        assert!(Viewer::Admin(id).is_admin());
        assert!(!Viewer::User(id).is_admin());
    }
}
