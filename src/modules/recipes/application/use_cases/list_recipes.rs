use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::recipes::application::domain::entities::Difficulty;
use crate::recipes::application::ports::outgoing::recipe_query::{
    PageRequest, RecipeListFilter, RecipeQuery, SortSpec, Viewer,
};
use crate::shared::api::PaginationMeta;

const MAX_PAGE_SIZE: u32 = 100;

// ========================= List Request =========================
/// Raw query-string parameters. Everything is optional and lenient:
/// unparsable values fall back to defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRecipesParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "maxPrepTime")]
    pub max_prep_time: Option<String>,
    pub dietary: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub fields: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListRecipesRequest {
    filter: RecipeListFilter,
    sort: Vec<SortSpec>,
    page: PageRequest,
    fields: Vec<String>,
}

impl ListRecipesRequest {
    pub fn from_params(params: ListRecipesParams) -> Self {
        let filter = RecipeListFilter {
            search: params.search.filter(|s| !s.trim().is_empty()),
            category: params.category.and_then(|s| Uuid::parse_str(s.trim()).ok()),
            cuisine: params.cuisine.filter(|s| !s.trim().is_empty()),
            difficulty: params.difficulty.and_then(|s| Difficulty::parse(s.trim())),
            max_prep_time: params
                .max_prep_time
                .and_then(|s| s.trim().parse::<i32>().ok())
                .filter(|v| *v >= 0),
            dietary: params
                .dietary
                .map(|s| {
                    s.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };

        let sort = params
            .sort
            .as_deref()
            .map(SortSpec::parse_list)
            .unwrap_or_else(|| vec![SortSpec::default()]);

        let defaults = PageRequest::default();
        let page = PageRequest {
            page: params
                .page
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|p| *p >= 1)
                .unwrap_or(defaults.page),
            limit: params
                .limit
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|l| *l >= 1)
                .unwrap_or(defaults.limit)
                .min(MAX_PAGE_SIZE),
        };

        let fields = params
            .fields
            .map(|s| {
                s.split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            filter,
            sort,
            page,
            fields,
        }
    }

    pub fn filter(&self) -> &RecipeListFilter {
        &self.filter
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }
}

// ====================== List Error =============================
#[derive(Debug, Clone)]
pub enum ListRecipesError {
    QueryError(String),
}

impl std::fmt::Display for ListRecipesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListRecipesError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for ListRecipesError {}

// ====================== List Output =============================
/// Items are pre-serialized so the `fields` projection can drop keys.
#[derive(Debug, Clone)]
pub struct ListRecipesOutput {
    pub recipes: Vec<serde_json::Value>,
    pub results: usize,
    pub pagination: PaginationMeta,
}

// ====================== List Recipes Use Case ======================
#[async_trait]
pub trait IListRecipesUseCase: Send + Sync {
    async fn execute(
        &self,
        viewer: Viewer,
        request: ListRecipesRequest,
    ) -> Result<ListRecipesOutput, ListRecipesError>;
}

pub struct ListRecipesUseCase<Q>
where
    Q: RecipeQuery,
{
    query: Q,
}

impl<Q> ListRecipesUseCase<Q>
where
    Q: RecipeQuery,
{
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

/// Keeps only the requested keys of a serialized recipe. `id` always stays.
fn project_fields(mut item: serde_json::Value, fields: &[String]) -> serde_json::Value {
    if fields.is_empty() {
        return item;
    }
    if let Some(map) = item.as_object_mut() {
        map.retain(|key, _| key == "id" || fields.iter().any(|f| f == key));
    }
    item
}

#[async_trait]
impl<Q> IListRecipesUseCase for ListRecipesUseCase<Q>
where
    Q: RecipeQuery,
{
    async fn execute(
        &self,
        viewer: Viewer,
        request: ListRecipesRequest,
    ) -> Result<ListRecipesOutput, ListRecipesError> {
        let page = self
            .query
            .list(&viewer, &request.filter, &request.sort, request.page)
            .await
            .map_err(|e| ListRecipesError::QueryError(e.to_string()))?;

        let recipes: Vec<serde_json::Value> = page
            .items
            .into_iter()
            .map(|view| {
                let serialized =
                    serde_json::to_value(&view).unwrap_or(serde_json::Value::Null);
                project_fields(serialized, &request.fields)
            })
            .collect();

        Ok(ListRecipesOutput {
            results: recipes.len(),
            pagination: PaginationMeta::new(request.page.page, request.page.limit, page.total),
            recipes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::application::domain::entities::{
        RecipeStatus, Visibility,
    };
    use crate::recipes::application::ports::outgoing::recipe_query::{
        PageResult, RecipeQueryError, RecipeView,
    };
    use chrono::Utc;
    use std::sync::Mutex;

    fn sample_view(title: &str) -> RecipeView {
        let now = Utc::now();
        RecipeView {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "A test recipe".to_string(),
            author: None,
            category: None,
            cuisine: Some("italian".to_string()),
            difficulty: Difficulty::Easy,
            status: RecipeStatus::Published,
            visibility: Visibility::Public,
            prep_time: 10,
            cook_time: 20,
            total_time: 30,
            servings: 4,
            ingredients: vec![],
            instructions: vec![],
            dietary: vec!["vegetarian".to_string()],
            tags: vec![],
            average_rating: 4.5,
            total_ratings: 2,
            views: 10,
            likes: 3,
            bookmarks: 1,
            created_at: now,
            updated_at: now,
        }
    }

    struct MockQuery {
        result: Result<PageResult<RecipeView>, RecipeQueryError>,
        captured: Mutex<Option<(Viewer, RecipeListFilter, Vec<SortSpec>, PageRequest)>>,
    }

    #[async_trait]
    impl RecipeQuery for MockQuery {
        async fn list(
            &self,
            viewer: &Viewer,
            filter: &RecipeListFilter,
            sort: &[SortSpec],
            page: PageRequest,
        ) -> Result<PageResult<RecipeView>, RecipeQueryError> {
            *self.captured.lock().unwrap() =
                Some((*viewer, filter.clone(), sort.to_vec(), page));
            self.result.clone()
        }

        async fn find_view(
            &self,
            _recipe_id: Uuid,
        ) -> Result<Option<RecipeView>, RecipeQueryError> {
            unimplemented!()
        }
    }

    // ==================== Request parsing ====================

    #[test]
    fn test_params_defaults() {
        let request = ListRecipesRequest::from_params(ListRecipesParams::default());

        assert_eq!(request.page, PageRequest { page: 1, limit: 12 });
        assert_eq!(request.sort, vec![SortSpec::default()]);
        assert!(request.fields.is_empty());
        assert_eq!(request.filter, RecipeListFilter::default());
    }

    #[test]
    fn test_params_invalid_values_fall_back() {
        let request = ListRecipesRequest::from_params(ListRecipesParams {
            page: Some("zero".to_string()),
            limit: Some("-3".to_string()),
            difficulty: Some("impossible".to_string()),
            max_prep_time: Some("soon".to_string()),
            category: Some("not-a-uuid".to_string()),
            ..Default::default()
        });

        assert_eq!(request.page, PageRequest { page: 1, limit: 12 });
        assert_eq!(request.filter.difficulty, None);
        assert_eq!(request.filter.max_prep_time, None);
        assert_eq!(request.filter.category, None);
    }

    #[test]
    fn test_params_limit_is_capped() {
        let request = ListRecipesRequest::from_params(ListRecipesParams {
            limit: Some("5000".to_string()),
            ..Default::default()
        });

        assert_eq!(request.page.limit, 100);
    }

    #[test]
    fn test_params_dietary_splits_on_commas() {
        let request = ListRecipesRequest::from_params(ListRecipesParams {
            dietary: Some("vegan, gluten_free,,".to_string()),
            ..Default::default()
        });

        assert_eq!(request.filter.dietary, vec!["vegan", "gluten_free"]);
    }

    // ==================== Use case ====================

    #[tokio::test]
    async fn test_list_passes_viewer_and_builds_pagination() {
        let use_case = ListRecipesUseCase::new(MockQuery {
            result: Ok(PageResult {
                items: vec![sample_view("Carbonara"), sample_view("Ragu")],
                total: 25,
            }),
            captured: Mutex::new(None),
        });

        let request = ListRecipesRequest::from_params(ListRecipesParams {
            page: Some("2".to_string()),
            ..Default::default()
        });
        let viewer = Viewer::Anonymous;

        let output = use_case.execute(viewer, request).await.unwrap();

        assert_eq!(output.results, 2);
        assert_eq!(output.pagination.page, 2);
        assert_eq!(output.pagination.total, 25);
        assert_eq!(output.pagination.pages, 3); // ceil(25/12)

        let captured = use_case.query.captured.lock().unwrap();
        let (viewer, _, _, page) = captured.as_ref().unwrap();
        assert_eq!(*viewer, Viewer::Anonymous);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_list_page_beyond_last_is_empty_not_an_error() {
        let use_case = ListRecipesUseCase::new(MockQuery {
            result: Ok(PageResult {
                items: vec![],
                total: 5,
            }),
            captured: Mutex::new(None),
        });

        let request = ListRecipesRequest::from_params(ListRecipesParams {
            page: Some("99".to_string()),
            ..Default::default()
        });

        let output = use_case.execute(Viewer::Anonymous, request).await.unwrap();

        assert_eq!(output.results, 0);
        assert_eq!(output.pagination.pages, 1);
    }

    #[tokio::test]
    async fn test_list_fields_projection_keeps_id() {
        let use_case = ListRecipesUseCase::new(MockQuery {
            result: Ok(PageResult {
                items: vec![sample_view("Carbonara")],
                total: 1,
            }),
            captured: Mutex::new(None),
        });

        let request = ListRecipesRequest::from_params(ListRecipesParams {
            fields: Some("title,averageRating".to_string()),
            ..Default::default()
        });

        let output = use_case.execute(Viewer::Anonymous, request).await.unwrap();

        let recipe = output.recipes[0].as_object().unwrap();
        assert_eq!(recipe.len(), 3);
        assert!(recipe.contains_key("id"));
        assert_eq!(recipe["title"], "Carbonara");
        assert_eq!(recipe["averageRating"], 4.5);
    }

    #[tokio::test]
    async fn test_list_query_error_propagates() {
        let use_case = ListRecipesUseCase::new(MockQuery {
            result: Err(RecipeQueryError::DatabaseError("down".to_string())),
            captured: Mutex::new(None),
        });

        let request = ListRecipesRequest::from_params(ListRecipesParams::default());
        let result = use_case.execute(Viewer::Anonymous, request).await;

        assert!(matches!(result, Err(ListRecipesError::QueryError(_))));
    }
}
