use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::CategoryRepository;
use crate::recipes::application::domain::entities::{
    is_known_dietary_tag, Difficulty, Ingredient, InstructionStep, RecipeStatus, Visibility,
};
use crate::recipes::application::ports::outgoing::recipe_query::{
    RecipeQuery, RecipeView, Viewer,
};
use crate::recipes::application::ports::outgoing::recipe_repository::{
    RecipeRepository, RecipeUpdate,
};
use crate::recipes::application::use_cases::create_recipe::{IngredientInput, InstructionInput};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 150;
const DESCRIPTION_MAX: usize = 2000;

// ========================= Update Recipe Request =========================
/// Partial update: absent fields keep their current value.
#[derive(Debug, Clone)]
pub struct UpdateRecipeRequest {
    update: RecipeUpdate,
}

#[derive(Debug, Clone)]
pub enum UpdateRecipeRequestError {
    NoFieldsProvided,
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

impl std::fmt::Display for UpdateRecipeRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateRecipeRequestError::NoFieldsProvided => {
                write!(f, "At least one field must be provided")
            }
            UpdateRecipeRequestError::TitleLength => write!(
                f,
                "Title must be between {} and {} characters",
                TITLE_MIN, TITLE_MAX
            ),
            UpdateRecipeRequestError::DescriptionEmpty => {
                write!(f, "Description must not be empty")
            }
            UpdateRecipeRequestError::DescriptionTooLong => {
                write!(f, "Description must be at most {} characters", DESCRIPTION_MAX)
            }
            UpdateRecipeRequestError::NegativeTime => {
                write!(f, "Preparation and cooking times must not be negative")
            }
            UpdateRecipeRequestError::InvalidServings => {
                write!(f, "Servings must be at least 1")
            }
            UpdateRecipeRequestError::NoIngredients => {
                write!(f, "At least one ingredient is required")
            }
            UpdateRecipeRequestError::InvalidIngredient(name) => {
                write!(f, "Invalid ingredient: {}", name)
            }
            UpdateRecipeRequestError::NoInstructions => {
                write!(f, "At least one instruction step is required")
            }
            UpdateRecipeRequestError::EmptyInstruction(step) => {
                write!(f, "Instruction step {} has no description", step)
            }
            UpdateRecipeRequestError::UnknownDietaryTag(tag) => {
                write!(f, "Unknown dietary tag: {}", tag)
            }
        }
    }
}

impl std::error::Error for UpdateRecipeRequestError {}

#[derive(Debug, Clone, Default)]
pub struct UpdateRecipeFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub cuisine: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<RecipeStatus>,
    pub visibility: Option<Visibility>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Option<Vec<IngredientInput>>,
    pub instructions: Option<Vec<InstructionInput>>,
    pub dietary: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateRecipeFields {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.cuisine.is_none()
            && self.difficulty.is_none()
            && self.status.is_none()
            && self.visibility.is_none()
            && self.prep_time.is_none()
            && self.cook_time.is_none()
            && self.servings.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.dietary.is_none()
            && self.tags.is_none()
    }
}

impl UpdateRecipeRequest {
    pub fn new(fields: UpdateRecipeFields) -> Result<Self, UpdateRecipeRequestError> {
        if fields.is_empty() {
            return Err(UpdateRecipeRequestError::NoFieldsProvided);
        }

        let title = fields.title.map(|t| t.trim().to_string());
        if let Some(t) = &title {
            if t.chars().count() < TITLE_MIN || t.chars().count() > TITLE_MAX {
                return Err(UpdateRecipeRequestError::TitleLength);
            }
        }

        let description = fields.description.map(|d| d.trim().to_string());
        if let Some(d) = &description {
            if d.is_empty() {
                return Err(UpdateRecipeRequestError::DescriptionEmpty);
            }
            if d.chars().count() > DESCRIPTION_MAX {
                return Err(UpdateRecipeRequestError::DescriptionTooLong);
            }
        }

        if fields.prep_time.is_some_and(|t| t < 0) || fields.cook_time.is_some_and(|t| t < 0) {
            return Err(UpdateRecipeRequestError::NegativeTime);
        }
        if fields.servings.is_some_and(|s| s < 1) {
            return Err(UpdateRecipeRequestError::InvalidServings);
        }

        let ingredients = match fields.ingredients {
            Some(inputs) => {
                if inputs.is_empty() {
                    return Err(UpdateRecipeRequestError::NoIngredients);
                }
                Some(
                    inputs
                        .into_iter()
                        .map(|input| {
                            let name = input.name.trim().to_string();
                            if name.is_empty() || input.quantity <= 0.0 {
                                return Err(UpdateRecipeRequestError::InvalidIngredient(
                                    input.name,
                                ));
                            }
                            Ok(Ingredient {
                                name,
                                quantity: input.quantity,
                                unit: input.unit,
                                note: input
                                    .note
                                    .map(|n| n.trim().to_string())
                                    .filter(|n| !n.is_empty()),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
            None => None,
        };

        let instructions = match fields.instructions {
            Some(inputs) => {
                if inputs.is_empty() {
                    return Err(UpdateRecipeRequestError::NoInstructions);
                }
                Some(
                    inputs
                        .into_iter()
                        .enumerate()
                        .map(|(i, input)| {
                            let description = input.description.trim().to_string();
                            if description.is_empty() {
                                return Err(UpdateRecipeRequestError::EmptyInstruction(i + 1));
                            }
                            Ok(InstructionStep {
                                step: (i + 1) as i32,
                                description,
                                duration_minutes: input.duration_minutes,
                                temperature_celsius: input.temperature_celsius,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
            None => None,
        };

        let dietary = match fields.dietary {
            Some(tags) => {
                let tags: Vec<String> =
                    tags.into_iter().map(|t| t.trim().to_lowercase()).collect();
                if let Some(bad) = tags.iter().find(|t| !is_known_dietary_tag(t)) {
                    return Err(UpdateRecipeRequestError::UnknownDietaryTag(bad.clone()));
                }
                Some(tags)
            }
            None => None,
        };

        let tags = fields.tags.map(|tags| {
            tags.into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        });

        Ok(Self {
            update: RecipeUpdate {
                title,
                description,
                cuisine: fields.cuisine.map(|c| c.trim().to_string()),
                difficulty: fields.difficulty,
                status: fields.status,
                visibility: fields.visibility,
                category_id: fields.category_id,
                prep_time: fields.prep_time,
                cook_time: fields.cook_time,
                servings: fields.servings,
                ingredients,
                instructions,
                dietary,
                tags,
            },
        })
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.update.category_id
    }

    fn into_update(self) -> RecipeUpdate {
        self.update
    }
}

impl<'de> Deserialize<'de> for UpdateRecipeRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UpdateRecipeRequestHelper {
            title: Option<String>,
            description: Option<String>,
            category_id: Option<Uuid>,
            cuisine: Option<String>,
            difficulty: Option<Difficulty>,
            status: Option<RecipeStatus>,
            visibility: Option<Visibility>,
            prep_time: Option<i32>,
            cook_time: Option<i32>,
            servings: Option<i32>,
            ingredients: Option<Vec<IngredientInput>>,
            instructions: Option<Vec<InstructionInput>>,
            dietary: Option<Vec<String>>,
            tags: Option<Vec<String>>,
        }

        let helper = UpdateRecipeRequestHelper::deserialize(deserializer)?;
        UpdateRecipeRequest::new(UpdateRecipeFields {
            title: helper.title,
            description: helper.description,
            category_id: helper.category_id,
            cuisine: helper.cuisine,
            difficulty: helper.difficulty,
            status: helper.status,
            visibility: helper.visibility,
            prep_time: helper.prep_time,
            cook_time: helper.cook_time,
            servings: helper.servings,
            ingredients: helper.ingredients,
            instructions: helper.instructions,
            dietary: helper.dietary,
            tags: helper.tags,
        })
        .map_err(serde::de::Error::custom)
    }
}

// ====================== Update Recipe Error =============================
#[derive(Debug, Clone)]
pub enum UpdateRecipeError {
    RecipeNotFound,
    NotOwner,
    InvalidCategory,
    RepositoryError(String),
    QueryError(String),
}

impl std::fmt::Display for UpdateRecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateRecipeError::RecipeNotFound => write!(f, "Recipe not found"),
            UpdateRecipeError::NotOwner => {
                write!(f, "Only the author or an administrator may modify this recipe")
            }
            UpdateRecipeError::InvalidCategory => write!(f, "Category does not exist"),
            UpdateRecipeError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            UpdateRecipeError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for UpdateRecipeError {}

// ====================== Update Recipe Use Case ======================
#[async_trait]
pub trait IUpdateRecipeUseCase: Send + Sync {
    async fn execute(
        &self,
        actor: Viewer,
        recipe_id: Uuid,
        request: UpdateRecipeRequest,
    ) -> Result<RecipeView, UpdateRecipeError>;
}

pub struct UpdateRecipeUseCase<R, C, Q>
where
    R: RecipeRepository,
    C: CategoryRepository,
    Q: RecipeQuery,
{
    repository: R,
    categories: C,
    query: Q,
}

impl<R, C, Q> UpdateRecipeUseCase<R, C, Q>
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
impl<R, C, Q> IUpdateRecipeUseCase for UpdateRecipeUseCase<R, C, Q>
where
    R: RecipeRepository,
    C: CategoryRepository,
    Q: RecipeQuery,
{
    async fn execute(
        &self,
        actor: Viewer,
        recipe_id: Uuid,
        request: UpdateRecipeRequest,
    ) -> Result<RecipeView, UpdateRecipeError> {
        let record = self
            .repository
            .fetch_record(recipe_id)
            .await
            .map_err(|e| UpdateRecipeError::RepositoryError(e.to_string()))?
            .ok_or(UpdateRecipeError::RecipeNotFound)?;

        let is_author = actor.user_id() == Some(record.author_id);
        if !is_author && !actor.is_admin() {
            return Err(UpdateRecipeError::NotOwner);
        }

        // Category moves keep both counters in step.
        let category_move = match request.category_id() {
            Some(new_category) if new_category != record.category_id => {
                let exists = self
                    .categories
                    .exists(new_category)
                    .await
                    .map_err(|e| UpdateRecipeError::RepositoryError(e.to_string()))?;
                if !exists {
                    return Err(UpdateRecipeError::InvalidCategory);
                }
                Some((record.category_id, new_category))
            }
            _ => None,
        };

        self.repository
            .apply_update(recipe_id, request.into_update())
            .await
            .map_err(|e| UpdateRecipeError::RepositoryError(e.to_string()))?;

        if let Some((old_category, new_category)) = category_move {
            if let Err(e) = self.categories.adjust_recipe_count(old_category, -1).await {
                tracing::warn!(
                    "Failed to decrement recipe count for category {}: {}",
                    old_category,
                    e
                );
            }
            if let Err(e) = self.categories.adjust_recipe_count(new_category, 1).await {
                tracing::warn!(
                    "Failed to increment recipe count for category {}: {}",
                    new_category,
                    e
                );
            }
        }

        self.query
            .find_view(recipe_id)
            .await
            .map_err(|e| UpdateRecipeError::QueryError(e.to_string()))?
            .ok_or(UpdateRecipeError::RecipeNotFound)
    }
}
