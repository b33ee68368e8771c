use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::CategoryRepository;
use crate::recipes::application::domain::entities::{
    is_known_dietary_tag, Difficulty, Ingredient, InstructionStep, MeasureUnit, Visibility,
};
use crate::recipes::application::ports::outgoing::recipe_query::{RecipeQuery, RecipeView};
use crate::recipes::application::ports::outgoing::recipe_repository::{
    RecipeDraft, RecipeRepository,
};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 150;
const DESCRIPTION_MAX: usize = 2000;

// ========================= Create Recipe Request =========================
#[derive(Debug, Clone)]
pub struct CreateRecipeRequest {
    title: String,
    description: String,
    category_id: Uuid,
    cuisine: Option<String>,
    difficulty: Difficulty,
    visibility: Visibility,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    ingredients: Vec<Ingredient>,
    instructions: Vec<InstructionStep>,
    dietary: Vec<String>,
    tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum CreateRecipeRequestError {
    TitleLength,
    DescriptionEmpty,
    DescriptionTooLong,
    NegativeTime,
    InvalidServings,
    NoIngredients,
    InvalidIngredient(String),
    NoInstructions,
    EmptyInstruction(usize),
    UnknownDietaryTag(String),
}

impl std::fmt::Display for CreateRecipeRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateRecipeRequestError::TitleLength => write!(
                f,
                "Title must be between {} and {} characters",
                TITLE_MIN, TITLE_MAX
            ),
            CreateRecipeRequestError::DescriptionEmpty => {
                write!(f, "Description must not be empty")
            }
            CreateRecipeRequestError::DescriptionTooLong => {
                write!(f, "Description must be at most {} characters", DESCRIPTION_MAX)
            }
            CreateRecipeRequestError::NegativeTime => {
                write!(f, "Preparation and cooking times must not be negative")
            }
            CreateRecipeRequestError::InvalidServings => {
                write!(f, "Servings must be at least 1")
            }
            CreateRecipeRequestError::NoIngredients => {
                write!(f, "At least one ingredient is required")
            }
            CreateRecipeRequestError::InvalidIngredient(name) => {
                write!(f, "Invalid ingredient: {}", name)
            }
            CreateRecipeRequestError::NoInstructions => {
                write!(f, "At least one instruction step is required")
            }
            CreateRecipeRequestError::EmptyInstruction(step) => {
                write!(f, "Instruction step {} has no description", step)
            }
            CreateRecipeRequestError::UnknownDietaryTag(tag) => {
                write!(f, "Unknown dietary tag: {}", tag)
            }
        }
    }
}

impl std::error::Error for CreateRecipeRequestError {}

/// Ingredient as it arrives on the wire, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub quantity: f64,
    pub unit: MeasureUnit,
    pub note: Option<String>,
}

/// Instruction step as it arrives on the wire. Client-sent step numbers are
/// ignored; steps are renumbered in the order they were given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionInput {
    pub description: String,
    pub duration_minutes: Option<i32>,
    pub temperature_celsius: Option<i32>,
}

#[allow(clippy::too_many_arguments)]
impl CreateRecipeRequest {
    pub fn new(
        title: String,
        description: String,
        category_id: Uuid,
        cuisine: Option<String>,
        difficulty: Difficulty,
        visibility: Option<Visibility>,
        prep_time: i32,
        cook_time: i32,
        servings: i32,
        ingredients: Vec<IngredientInput>,
        instructions: Vec<InstructionInput>,
        dietary: Vec<String>,
        tags: Vec<String>,
    ) -> Result<Self, CreateRecipeRequestError> {
        let title = title.trim().to_string();
        if title.chars().count() < TITLE_MIN || title.chars().count() > TITLE_MAX {
            return Err(CreateRecipeRequestError::TitleLength);
        }

        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(CreateRecipeRequestError::DescriptionEmpty);
        }
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(CreateRecipeRequestError::DescriptionTooLong);
        }

        if prep_time < 0 || cook_time < 0 {
            return Err(CreateRecipeRequestError::NegativeTime);
        }
        if servings < 1 {
            return Err(CreateRecipeRequestError::InvalidServings);
        }

        if ingredients.is_empty() {
            return Err(CreateRecipeRequestError::NoIngredients);
        }
        let ingredients = ingredients
            .into_iter()
            .map(|input| {
                let name = input.name.trim().to_string();
                if name.is_empty() || input.quantity <= 0.0 {
                    return Err(CreateRecipeRequestError::InvalidIngredient(input.name));
                }
                Ok(Ingredient {
                    name,
                    quantity: input.quantity,
                    unit: input.unit,
                    note: input.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if instructions.is_empty() {
            return Err(CreateRecipeRequestError::NoInstructions);
        }
        let instructions = instructions
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let description = input.description.trim().to_string();
                if description.is_empty() {
                    return Err(CreateRecipeRequestError::EmptyInstruction(i + 1));
                }
                Ok(InstructionStep {
                    step: (i + 1) as i32,
                    description,
                    duration_minutes: input.duration_minutes,
                    temperature_celsius: input.temperature_celsius,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let dietary: Vec<String> = dietary
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        if let Some(bad) = dietary.iter().find(|t| !is_known_dietary_tag(t)) {
            return Err(CreateRecipeRequestError::UnknownDietaryTag(bad.clone()));
        }

        let tags = tags
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            title,
            description,
            category_id,
            cuisine: cuisine.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            difficulty,
            visibility: visibility.unwrap_or(Visibility::Public),
            prep_time,
            cook_time,
            servings,
            ingredients,
            instructions,
            dietary,
            tags,
        })
    }

    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    fn into_draft(self, author_id: Uuid) -> RecipeDraft {
        RecipeDraft {
            author_id,
            category_id: self.category_id,
            title: self.title,
            description: self.description,
            cuisine: self.cuisine,
            difficulty: self.difficulty,
            visibility: self.visibility,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            ingredients: self.ingredients,
            instructions: self.instructions,
            dietary: self.dietary,
            tags: self.tags,
        }
    }
}

impl<'de> Deserialize<'de> for CreateRecipeRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreateRecipeRequestHelper {
            title: String,
            description: String,
            category_id: Uuid,
            cuisine: Option<String>,
            difficulty: Difficulty,
            visibility: Option<Visibility>,
            prep_time: i32,
            cook_time: i32,
            servings: i32,
            ingredients: Vec<IngredientInput>,
            instructions: Vec<InstructionInput>,
            #[serde(default)]
            dietary: Vec<String>,
            #[serde(default)]
            tags: Vec<String>,
        }

        let helper = CreateRecipeRequestHelper::deserialize(deserializer)?;
        CreateRecipeRequest::new(
            helper.title,
            helper.description,
            helper.category_id,
            helper.cuisine,
            helper.difficulty,
            helper.visibility,
            helper.prep_time,
            helper.cook_time,
            helper.servings,
            helper.ingredients,
            helper.instructions,
            helper.dietary,
            helper.tags,
        )
        .map_err(serde::de::Error::custom)
    }
}

// ====================== Create Recipe Error =============================
#[derive(Debug, Clone)]
pub enum CreateRecipeError {
    InvalidCategory,
    RepositoryError(String),
    QueryError(String),
}

impl std::fmt::Display for CreateRecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateRecipeError::InvalidCategory => {
                write!(f, "Category does not exist")
            }
            CreateRecipeError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            CreateRecipeError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for CreateRecipeError {}

// ====================== Create Recipe Use Case ======================
#[async_trait]
pub trait ICreateRecipeUseCase: Send + Sync {
    async fn execute(
        &self,
        author_id: Uuid,
        request: CreateRecipeRequest,
    ) -> Result<RecipeView, CreateRecipeError>;
}

pub struct CreateRecipeUseCase<R, C, Q>
where
    R: RecipeRepository,
    C: CategoryRepository,
    Q: RecipeQuery,
{
    repository: R,
    categories: C,
    query: Q,
}

impl<R, C, Q> CreateRecipeUseCase<R, C, Q>
where
    R: RecipeRepository,
    C: CategoryRepository,
    Q: RecipeQuery,
{
    pub fn new(repository: R, categories: C, query: Q) -> Self {
        Self {
            repository,
            categories,
            query,
        }
    }
}

#[async_trait]
impl<R, C, Q> ICreateRecipeUseCase for CreateRecipeUseCase<R, C, Q>
where
    R: RecipeRepository,
    C: CategoryRepository,
    Q: RecipeQuery,
{
    async fn execute(
        &self,
        author_id: Uuid,
        request: CreateRecipeRequest,
    ) -> Result<RecipeView, CreateRecipeError> {
        let category_id = request.category_id();

        let category_exists = self
            .categories
            .exists(category_id)
            .await
            .map_err(|e| CreateRecipeError::RepositoryError(e.to_string()))?;
        if !category_exists {
            return Err(CreateRecipeError::InvalidCategory);
        }

        let recipe_id = self
            .repository
            .create(request.into_draft(author_id))
            .await
            .map_err(|e| CreateRecipeError::RepositoryError(e.to_string()))?;

        // Counter drift here is repaired by the category recount operation.
        if let Err(e) = self.categories.adjust_recipe_count(category_id, 1).await {
            tracing::warn!(
                "Failed to bump recipe count for category {}: {}",
                category_id,
                e
            );
        }

        self.query
            .find_view(recipe_id)
            .await
            .map_err(|e| CreateRecipeError::QueryError(e.to_string()))?
            .ok_or_else(|| {
                CreateRecipeError::QueryError("created recipe could not be loaded".to_string())
            })
    }
}
