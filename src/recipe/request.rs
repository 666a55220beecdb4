//! Inbound recipe request and the option sets the form offers.

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

pub const MEAL_TYPES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snack", "Dessert"];

pub const COOKING_TIMES: &[&str] = &[
    "15 minutes",
    "30 minutes",
    "45 minutes",
    "1 hour",
    "1+ hours",
];

pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegan",
    "Vegetarian",
    "Gluten-free",
    "Dairy-free",
    "Low-carb",
    "Keto",
];

/// What the user has on hand and what they want.
///
/// `cooking_time` and `meal_type` are normally drawn from [`COOKING_TIMES`] and
/// [`MEAL_TYPES`], but any non-blank value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
    pub cooking_time: String,
    pub meal_type: String,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
}

impl RecipeRequest {
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.ingredients.is_empty() {
            return Err(RecipeError::InvalidRequest(
                "at least one ingredient is required".to_string(),
            ));
        }
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(RecipeError::InvalidRequest(
                "ingredients must not be blank".to_string(),
            ));
        }
        if self.cooking_time.trim().is_empty() {
            return Err(RecipeError::InvalidRequest(
                "cookingTime is required".to_string(),
            ));
        }
        if self.meal_type.trim().is_empty() {
            return Err(RecipeError::InvalidRequest("mealType is required".to_string()));
        }
        Ok(())
    }
}

/// The fixed choices served by `GET /options`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeOptions {
    pub meal_types: &'static [&'static str],
    pub cooking_times: &'static [&'static str],
    pub dietary_options: &'static [&'static str],
}

impl RecipeOptions {
    pub fn standard() -> Self {
        Self {
            meal_types: MEAL_TYPES,
            cooking_times: COOKING_TIMES,
            dietary_options: DIETARY_OPTIONS,
        }
    }
}
