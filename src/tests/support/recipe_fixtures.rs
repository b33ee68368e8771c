use chrono::Utc;
use uuid::Uuid;

use crate::recipes::application::domain::entities::{
    Difficulty, Ingredient, InstructionStep, MeasureUnit, RecipeStatus, Visibility,
};
use crate::recipes::application::ports::outgoing::recipe_query::{
    AuthorRef, CategoryRef, RecipeView,
};

/// A published, publicly visible recipe with every reference populated.
pub fn sample_recipe_view(id: Uuid) -> RecipeView {
    let now = Utc::now();
    RecipeView {
        id,
        title: "Shakshuka".to_string(),
        description: "Eggs poached in a spiced tomato and pepper sauce.".to_string(),
        author: Some(AuthorRef {
            id: Uuid::new_v4(),
            username: "marta".to_string(),
        }),
        category: Some(CategoryRef {
            id: Uuid::new_v4(),
            name: "Breakfast".to_string(),
            slug: "breakfast".to_string(),
        }),
        cuisine: Some("Middle Eastern".to_string()),
        difficulty: Difficulty::Easy,
        status: RecipeStatus::Published,
        visibility: Visibility::Public,
        prep_time: 10,
        cook_time: 25,
        total_time: 35,
        servings: 4,
        ingredients: vec![
            Ingredient {
                name: "Canned tomatoes".to_string(),
                quantity: 800.0,
                unit: MeasureUnit::G,
                note: None,
            },
            Ingredient {
                name: "Eggs".to_string(),
                quantity: 6.0,
                unit: MeasureUnit::Piece,
                note: None,
            },
        ],
        instructions: vec![InstructionStep {
            step: 1,
            description: "Simmer the sauce, then crack in the eggs.".to_string(),
            duration_minutes: Some(25),
            temperature_celsius: None,
        }],
        dietary: vec!["vegetarian".to_string()],
        tags: vec!["breakfast".to_string(), "eggs".to_string()],
        average_rating: 4.5,
        total_ratings: 12,
        views: 230,
        likes: 18,
        bookmarks: 7,
        created_at: now,
        updated_at: now,
    }
}
