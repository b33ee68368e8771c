use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    Draft,
    Published,
    Archived,
    PendingReview,
}

impl RecipeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeStatus::Draft => "draft",
            RecipeStatus::Published => "published",
            RecipeStatus::Archived => "archived",
            RecipeStatus::PendingReview => "pending_review",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(RecipeStatus::Draft),
            "published" => Some(RecipeStatus::Published),
            "archived" => Some(RecipeStatus::Archived),
            "pending_review" => Some(RecipeStatus::PendingReview),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    FriendsOnly,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::FriendsOnly => "friends_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "friends_only" => Some(Visibility::FriendsOnly),
            _ => None,
        }
    }
}

/// Closed unit vocabulary for ingredient quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    G,
    Kg,
    Ml,
    L,
    Tsp,
    Tbsp,
    Cup,
    Oz,
    Lb,
    Piece,
    Slice,
    Pinch,
    Clove,
    Bunch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: MeasureUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub step: i32,
    pub description: String,
    #[serde(
        rename = "durationMinutes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<i32>,
    #[serde(
        rename = "temperatureCelsius",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_celsius: Option<i32>,
}

/// Recognized dietary restriction tags. Filter values and stored tags both
/// come from this list.
pub const DIETARY_TAGS: &[&str] = &[
    "vegetarian",
    "vegan",
    "gluten_free",
    "dairy_free",
    "nut_free",
    "halal",
    "kosher",
    "low_carb",
    "keto",
    "paleo",
];

pub fn is_known_dietary_tag(tag: &str) -> bool {
    DIETARY_TAGS.contains(&tag)
}

/// Mean of the submitted ratings, rounded to one decimal. No ratings → 0.0.
pub fn average_rating(values: &[i16]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: i64 = values.iter().map(|v| *v as i64).sum();
    let mean = sum as f64 / values.len() as f64;
    (mean * 10.0).round() / 10.0
}
