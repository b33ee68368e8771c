use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::categories::application::domain::entities::{
    child_path, slugify, MAX_CATEGORY_LEVEL,
};
use crate::categories::application::ports::outgoing::category_repository::{
    CategoryRecord, CategoryRepository, CategoryRepositoryError, NewCategory,
};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const SLUG_MAX: usize = 120;
const CODE_MAX: usize = 10;
const DESCRIPTION_MAX: usize = 500;

// ========================= Create Category Request =========================
#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    name: String,
    slug: String,
    code: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
    display_order: i32,
    is_active: bool,
}

#[derive(Debug, Clone)]
pub enum CreateCategoryRequestError {
    NameLength,
    SlugInvalid,
    CodeInvalid,
    DescriptionTooLong,
}

impl std::fmt::Display for CreateCategoryRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateCategoryRequestError::NameLength => write!(
                f,
                "Name must be between {} and {} characters",
                NAME_MIN, NAME_MAX
            ),
            CreateCategoryRequestError::SlugInvalid => write!(
                f,
                "Slug must be 1 to {} lowercase letters, digits and hyphens",
                SLUG_MAX
            ),
            CreateCategoryRequestError::CodeInvalid => write!(
                f,
                "Code must be 1 to {} letters and digits",
                CODE_MAX
            ),
            CreateCategoryRequestError::DescriptionTooLong => {
                write!(f, "Description must be at most {} characters", DESCRIPTION_MAX)
            }
        }
    }
}

impl std::error::Error for CreateCategoryRequestError {}

impl CreateCategoryRequest {
    pub fn new(
        name: String,
        slug: Option<String>,
        code: String,
        description: Option<String>,
        parent_id: Option<Uuid>,
        display_order: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<Self, CreateCategoryRequestError> {
        let name = name.trim().to_string();
        if name.chars().count() < NAME_MIN || name.chars().count() > NAME_MAX {
            return Err(CreateCategoryRequestError::NameLength);
        }

        // Explicit slugs are normalized the same way derived ones are.
        let slug = slugify(slug.as_deref().unwrap_or(&name));
        if slug.is_empty() || slug.len() > SLUG_MAX {
            return Err(CreateCategoryRequestError::SlugInvalid);
        }

        let code = code.trim().to_uppercase();
        if code.is_empty()
            || code.len() > CODE_MAX
            || !code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(CreateCategoryRequestError::CodeInvalid);
        }

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(d) = &description {
            if d.chars().count() > DESCRIPTION_MAX {
                return Err(CreateCategoryRequestError::DescriptionTooLong);
            }
        }

        Ok(Self {
            name,
            slug,
            code,
            description,
            parent_id,
            display_order: display_order.unwrap_or(0),
            is_active: is_active.unwrap_or(true),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }
}

impl<'de> Deserialize<'de> for CreateCategoryRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreateCategoryRequestHelper {
            name: String,
            slug: Option<String>,
            code: String,
            description: Option<String>,
            parent_id: Option<Uuid>,
            display_order: Option<i32>,
            is_active: Option<bool>,
        }

        let helper = CreateCategoryRequestHelper::deserialize(deserializer)?;
        CreateCategoryRequest::new(
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

// ====================== Create Category Error =============================
#[derive(Debug, Clone)]
pub enum CreateCategoryError {
    InvalidParent,
    DepthExceeded,
    DuplicateSlug,
    DuplicateCode,
    RepositoryError(String),
}

impl std::fmt::Display for CreateCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateCategoryError::InvalidParent => write!(f, "Parent category does not exist"),
            CreateCategoryError::DepthExceeded => write!(
                f,
                "Categories cannot be nested deeper than level {}",
                MAX_CATEGORY_LEVEL
            ),
            CreateCategoryError::DuplicateSlug => write!(f, "Slug is already in use"),
            CreateCategoryError::DuplicateCode => write!(f, "Code is already in use"),
            CreateCategoryError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CreateCategoryError {}

// ====================== Create Category Use Case ======================
#[async_trait]
pub trait ICreateCategoryUseCase: Send + Sync {
    async fn execute(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryRecord, CreateCategoryError>;
}

pub struct CreateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    repository: C,
}

impl<C> CreateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    pub fn new(repository: C) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<C> ICreateCategoryUseCase for CreateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    async fn execute(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryRecord, CreateCategoryError> {
        let (level, path) = match request.parent_id() {
            Some(parent_id) => {
                let parent = self
                    .repository
                    .find_by_id(parent_id)
                    .await
                    .map_err(|e| CreateCategoryError::RepositoryError(e.to_string()))?
                    .ok_or(CreateCategoryError::InvalidParent)?;

                let level = parent.level + 1;
                if level > MAX_CATEGORY_LEVEL {
                    return Err(CreateCategoryError::DepthExceeded);
                }
                (level, child_path(Some(&parent.path), request.slug()))
            }
            None => (0, child_path(None, request.slug())),
        };

        self.repository
            .insert(NewCategory {
                name: request.name,
                slug: request.slug,
                code: request.code,
                description: request.description,
                parent_id: request.parent_id,
                level,
                path,
                display_order: request.display_order,
                is_active: request.is_active,
            })
            .await
            .map_err(|e| match e {
                CategoryRepositoryError::DuplicateSlug => CreateCategoryError::DuplicateSlug,
                CategoryRepositoryError::DuplicateCode => CreateCategoryError::DuplicateCode,
                other => CreateCategoryError::RepositoryError(other.to_string()),
            })
    }
}
