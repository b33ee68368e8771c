use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::categories::application::domain::entities::{
    child_path, slugify, MAX_CATEGORY_LEVEL,
};
use crate::categories::application::ports::outgoing::category_repository::{
    CategoryChanges, CategoryRecord, CategoryRepository, CategoryRepositoryError,
};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const SLUG_MAX: usize = 120;
const CODE_MAX: usize = 10;
const DESCRIPTION_MAX: usize = 500;

/// Distinguishes an absent field from an explicit JSON null.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ========================= Update Category Request =========================
/// Partial update: absent fields keep their current value. `parentId: null`
/// detaches the category to the root level.
#[derive(Debug, Clone)]
pub struct UpdateCategoryRequest {
    name: Option<String>,
    slug: Option<String>,
    code: Option<String>,
    description: Option<Option<String>>,
    parent_id: Option<Option<Uuid>>,
    display_order: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub enum UpdateCategoryRequestError {
    NoFieldsProvided,
    NameLength,
    SlugInvalid,
    CodeInvalid,
    DescriptionTooLong,
}

impl std::fmt::Display for UpdateCategoryRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateCategoryRequestError::NoFieldsProvided => {
                write!(f, "At least one field must be provided")
            }
            UpdateCategoryRequestError::NameLength => write!(
                f,
                "Name must be between {} and {} characters",
                NAME_MIN, NAME_MAX
            ),
            UpdateCategoryRequestError::SlugInvalid => write!(
                f,
                "Slug must be 1 to {} lowercase letters, digits and hyphens",
                SLUG_MAX
            ),
            UpdateCategoryRequestError::CodeInvalid => write!(
                f,
                "Code must be 1 to {} letters and digits",
                CODE_MAX
            ),
            UpdateCategoryRequestError::DescriptionTooLong => {
                write!(f, "Description must be at most {} characters", DESCRIPTION_MAX)
            }
        }
    }
}

impl std::error::Error for UpdateCategoryRequestError {}

impl UpdateCategoryRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Option<String>,
        slug: Option<String>,
        code: Option<String>,
        description: Option<Option<String>>,
        parent_id: Option<Option<Uuid>>,
        display_order: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<Self, UpdateCategoryRequestError> {
        if name.is_none()
            && slug.is_none()
            && code.is_none()
            && description.is_none()
            && parent_id.is_none()
            && display_order.is_none()
            && is_active.is_none()
        {
            return Err(UpdateCategoryRequestError::NoFieldsProvided);
        }

        let name = name.map(|n| n.trim().to_string());
        if let Some(n) = &name {
            if n.chars().count() < NAME_MIN || n.chars().count() > NAME_MAX {
                return Err(UpdateCategoryRequestError::NameLength);
            }
        }

        let slug = slug.map(|s| slugify(&s));
        if let Some(s) = &slug {
            if s.is_empty() || s.len() > SLUG_MAX {
                return Err(UpdateCategoryRequestError::SlugInvalid);
            }
        }

        let code = code.map(|c| c.trim().to_uppercase());
        if let Some(c) = &code {
            if c.is_empty() || c.len() > CODE_MAX || !c.chars().all(|ch| ch.is_ascii_alphanumeric())
            {
                return Err(UpdateCategoryRequestError::CodeInvalid);
            }
        }

        let description = description.map(|d| {
            d.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        });
        if let Some(Some(d)) = &description {
            if d.chars().count() > DESCRIPTION_MAX {
                return Err(UpdateCategoryRequestError::DescriptionTooLong);
            }
        }

        Ok(Self {
            name,
            slug,
            code,
            description,
            parent_id,
            display_order,
            is_active,
        })
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn parent_id(&self) -> Option<Option<Uuid>> {
        self.parent_id
    }
}

impl<'de> Deserialize<'de> for UpdateCategoryRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UpdateCategoryRequestHelper {
            name: Option<String>,
            slug: Option<String>,
            code: Option<String>,
            #[serde(default, deserialize_with = "double_option")]
            description: Option<Option<String>>,
            #[serde(default, deserialize_with = "double_option")]
            parent_id: Option<Option<Uuid>>,
            display_order: Option<i32>,
            is_active: Option<bool>,
        }

        let helper = UpdateCategoryRequestHelper::deserialize(deserializer)?;
        UpdateCategoryRequest::new(
            helper.name,
            helper.slug,
            helper.code,
            helper.description,
            helper.parent_id,
            helper.display_order,
            helper.is_active,
        )
        .map_err(serde::de::Error::custom)
    }
}

// ====================== Update Category Error =============================
#[derive(Debug, Clone)]
pub enum UpdateCategoryError {
    CategoryNotFound,
    InvalidParent,
    DepthExceeded,
    /// Slug or parent changes would orphan descendant paths.
    HasChildren(u64),
    DuplicateSlug,
    DuplicateCode,
    RepositoryError(String),
}

impl std::fmt::Display for UpdateCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateCategoryError::CategoryNotFound => write!(f, "Category not found"),
            UpdateCategoryError::InvalidParent => {
                write!(f, "Parent category does not exist or would create a cycle")
            }
            UpdateCategoryError::DepthExceeded => write!(
                f,
                "Categories cannot be nested deeper than level {}",
                MAX_CATEGORY_LEVEL
            ),
            UpdateCategoryError::HasChildren(count) => write!(
                f,
                "Cannot move or rename the path of a category with {} subcategories",
                count
            ),
            UpdateCategoryError::DuplicateSlug => write!(f, "Slug is already in use"),
            UpdateCategoryError::DuplicateCode => write!(f, "Code is already in use"),
            UpdateCategoryError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UpdateCategoryError {}

// ====================== Update Category Use Case ======================
#[async_trait]
pub trait IUpdateCategoryUseCase: Send + Sync {
    async fn execute(
        &self,
        category_id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryRecord, UpdateCategoryError>;
}

pub struct UpdateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    repository: C,
}

impl<C> UpdateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    pub fn new(repository: C) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<C> IUpdateCategoryUseCase for UpdateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    async fn execute(
        &self,
        category_id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryRecord, UpdateCategoryError> {
        let current = self
            .repository
            .find_by_id(category_id)
            .await
            .map_err(|e| UpdateCategoryError::RepositoryError(e.to_string()))?
            .ok_or(UpdateCategoryError::CategoryNotFound)?;

        let slug_changes = request
            .slug()
            .is_some_and(|s| s != current.slug);
        let parent_changes = request
            .parent_id()
            .is_some_and(|p| p != current.parent_id);

        // Moving or re-slugging rewrites the materialized path. Descendants
        // would keep stale prefixes, so such changes require an empty subtree.
        if slug_changes || parent_changes {
            let children = self
                .repository
                .count_children(category_id)
                .await
                .map_err(|e| UpdateCategoryError::RepositoryError(e.to_string()))?;
            if children > 0 {
                return Err(UpdateCategoryError::HasChildren(children));
            }
        }

        let effective_slug = request.slug().unwrap_or(&current.slug).to_string();

        let (level, path) = if parent_changes {
            match request.parent_id().unwrap_or(None) {
                Some(new_parent_id) => {
                    if new_parent_id == category_id {
                        return Err(UpdateCategoryError::InvalidParent);
                    }
                    let parent = self
                        .repository
                        .find_by_id(new_parent_id)
                        .await
                        .map_err(|e| UpdateCategoryError::RepositoryError(e.to_string()))?
                        .ok_or(UpdateCategoryError::InvalidParent)?;

                    // A parent inside our own subtree would make the tree a cycle.
                    if parent.path == current.path
                        || parent.path.starts_with(&format!("{}/", current.path))
                    {
                        return Err(UpdateCategoryError::InvalidParent);
                    }

                    let level = parent.level + 1;
                    if level > MAX_CATEGORY_LEVEL {
                        return Err(UpdateCategoryError::DepthExceeded);
                    }
                    (level, child_path(Some(&parent.path), &effective_slug))
                }
                None => (0, child_path(None, &effective_slug)),
            }
        } else if slug_changes {
            let parent_path = current.path.rsplit_once('/').map(|(prefix, _)| prefix);
            (current.level, child_path(parent_path, &effective_slug))
        } else {
            (current.level, current.path.clone())
        };

        let path_changes = path != current.path;

        self.repository
            .update(
                category_id,
                CategoryChanges {
                    name: request.name,
                    slug: slug_changes.then_some(effective_slug),
                    code: request.code,
                    description: request.description,
                    parent_id: parent_changes.then(|| request.parent_id.unwrap_or(None)),
                    level: parent_changes.then_some(level),
                    path: path_changes.then_some(path),
                    display_order: request.display_order,
                    is_active: request.is_active,
                },
            )
            .await
            .map_err(|e| match e {
                CategoryRepositoryError::CategoryNotFound => {
                    UpdateCategoryError::CategoryNotFound
                }
                CategoryRepositoryError::DuplicateSlug => UpdateCategoryError::DuplicateSlug,
                CategoryRepositoryError::DuplicateCode => UpdateCategoryError::DuplicateCode,
                other => UpdateCategoryError::RepositoryError(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::application::ports::outgoing::category_repository::NewCategory;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn category(
        name: &str,
        slug: &str,
        parent_id: Option<Uuid>,
        level: i16,
        path: &str,
    ) -> CategoryRecord {
        let now = Utc::now();
        CategoryRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            code: slug.to_uppercase().chars().take(10).collect(),
            description: None,
            parent_id,
            level,
            path: path.to_string(),
            display_order: 0,
            is_active: true,
            recipe_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    struct MockCategories {
        records: HashMap<Uuid, CategoryRecord>,
        children: u64,
        updated: Mutex<Option<CategoryChanges>>,
    }

    impl MockCategories {
        fn with(records: Vec<CategoryRecord>, children: u64) -> Self {
            Self {
                records: records.into_iter().map(|r| (r.id, r)).collect(),
                children,
                updated: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CategoryRepository for MockCategories {
        async fn find_by_id(
            &self,
            category_id: Uuid,
        ) -> Result<Option<CategoryRecord>, CategoryRepositoryError> {
            Ok(self.records.get(&category_id).cloned())
        }
        async fn exists(&self, _category_id: Uuid) -> Result<bool, CategoryRepositoryError> {
            unimplemented!()
        }
        async fn insert(
            &self,
            _category: NewCategory,
        ) -> Result<CategoryRecord, CategoryRepositoryError> {
            unimplemented!()
        }
        async fn update(
            &self,
            category_id: Uuid,
            changes: CategoryChanges,
        ) -> Result<CategoryRecord, CategoryRepositoryError> {
            *self.updated.lock().unwrap() = Some(changes);
            self.records
                .get(&category_id)
                .cloned()
                .ok_or(CategoryRepositoryError::CategoryNotFound)
        }
        async fn delete(&self, _category_id: Uuid) -> Result<(), CategoryRepositoryError> {
            unimplemented!()
        }
        async fn count_children(
            &self,
            _category_id: Uuid,
        ) -> Result<u64, CategoryRepositoryError> {
            Ok(self.children)
        }
        async fn count_recipes(&self, _category_id: Uuid) -> Result<u64, CategoryRepositoryError> {
            unimplemented!()
        }
        async fn count_published_recipes(
            &self,
            _category_id: Uuid,
        ) -> Result<u64, CategoryRepositoryError> {
            unimplemented!()
        }
        async fn set_recipe_count(
            &self,
            _category_id: Uuid,
            _count: i64,
        ) -> Result<(), CategoryRepositoryError> {
            unimplemented!()
        }
        async fn adjust_recipe_count(
            &self,
            _category_id: Uuid,
            _delta: i64,
        ) -> Result<(), CategoryRepositoryError> {
            unimplemented!()
        }
        async fn list_active(&self) -> Result<Vec<CategoryRecord>, CategoryRepositoryError> {
            unimplemented!()
        }
    }

    #[test]
    fn test_request_rejects_empty_body() {
        let result = serde_json::from_value::<UpdateCategoryRequest>(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_distinguishes_null_parent_from_absent() {
        let detach: UpdateCategoryRequest =
            serde_json::from_value(json!({"parentId": null})).unwrap();
        assert_eq!(detach.parent_id(), Some(None));

        let rename: UpdateCategoryRequest =
            serde_json::from_value(json!({"name": "Renamed"})).unwrap();
        assert_eq!(rename.parent_id(), None);
    }

    #[tokio::test]
    async fn test_update_name_only_keeps_path() {
        let target = category("Desserts", "desserts", None, 0, "desserts");
        let id = target.id;
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![target], 3));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"name": "Sweet Things"})).unwrap();

        uc.execute(id, request).await.unwrap();

        let changes = uc.repository.updated.lock().unwrap().clone().unwrap();
        assert_eq!(changes.name.as_deref(), Some("Sweet Things"));
        assert_eq!(changes.slug, None);
        assert_eq!(changes.path, None);
    }

    #[tokio::test]
    async fn test_update_slug_recomputes_path_under_same_parent() {
        let parent_id = Uuid::new_v4();
        let target = category("Cakes", "cakes", Some(parent_id), 1, "desserts/cakes");
        let id = target.id;
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![target], 0));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"slug": "gateaux"})).unwrap();

        uc.execute(id, request).await.unwrap();

        let changes = uc.repository.updated.lock().unwrap().clone().unwrap();
        assert_eq!(changes.slug.as_deref(), Some("gateaux"));
        assert_eq!(changes.path.as_deref(), Some("desserts/gateaux"));
        assert_eq!(changes.level, None);
    }

    #[tokio::test]
    async fn test_update_slug_with_children_is_rejected() {
        let target = category("Desserts", "desserts", None, 0, "desserts");
        let id = target.id;
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![target], 2));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"slug": "sweets"})).unwrap();

        let result = uc.execute(id, request).await;

        assert!(matches!(result, Err(UpdateCategoryError::HasChildren(2))));
    }

    #[tokio::test]
    async fn test_update_move_under_new_parent() {
        let new_parent = category("Baking", "baking", None, 0, "baking");
        let new_parent_id = new_parent.id;
        let target = category("Cakes", "cakes", Some(Uuid::new_v4()), 1, "desserts/cakes");
        let id = target.id;
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![new_parent, target], 0));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"parentId": new_parent_id})).unwrap();

        uc.execute(id, request).await.unwrap();

        let changes = uc.repository.updated.lock().unwrap().clone().unwrap();
        assert_eq!(changes.parent_id, Some(Some(new_parent_id)));
        assert_eq!(changes.level, Some(1));
        assert_eq!(changes.path.as_deref(), Some("baking/cakes"));
    }

    #[tokio::test]
    async fn test_update_move_into_own_subtree_is_rejected() {
        let target = category("Desserts", "desserts", None, 0, "desserts");
        let id = target.id;
        let descendant = category("Cakes", "cakes", Some(id), 1, "desserts/cakes");
        let descendant_id = descendant.id;
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![target, descendant], 0));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"parentId": descendant_id})).unwrap();

        let result = uc.execute(id, request).await;

        assert!(matches!(result, Err(UpdateCategoryError::InvalidParent)));
    }

    #[tokio::test]
    async fn test_update_detach_to_root() {
        let target = category("Cakes", "cakes", Some(Uuid::new_v4()), 1, "desserts/cakes");
        let id = target.id;
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![target], 0));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"parentId": null})).unwrap();

        uc.execute(id, request).await.unwrap();

        let changes = uc.repository.updated.lock().unwrap().clone().unwrap();
        assert_eq!(changes.parent_id, Some(None));
        assert_eq!(changes.level, Some(0));
        assert_eq!(changes.path.as_deref(), Some("cakes"));
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let uc = UpdateCategoryUseCase::new(MockCategories::with(vec![], 0));
        let request: UpdateCategoryRequest =
            serde_json::from_value(json!({"name": "Anything"})).unwrap();

        let result = uc.execute(Uuid::new_v4(), request).await;

        assert!(matches!(result, Err(UpdateCategoryError::CategoryNotFound)));
    }
}
