//! Prompt construction for recipe generation.

use crate::recipe::request::RecipeRequest;

/// Separator used when listing ingredients and dietary preferences.
pub const LIST_SEPARATOR: &str = ", ";

/// Rendered in place of an empty dietary preference list.
pub const NO_PREFERENCES: &str = "None";

pub const SYSTEM_PROMPT: &str = r#"You are an expert chef and recipe creator. Generate personalized recipe suggestions based on the user's available ingredients, time, and preferences.

Your response should be a complete, detailed recipe in JSON format with this structure:
{
  "title": "Recipe Name",
  "description": "Brief appealing description",
  "cookingTime": "actual time in minutes",
  "difficulty": "Easy/Medium/Hard",
  "servings": number,
  "ingredients": [
    { "item": "ingredient name", "amount": "quantity", "optional": false }
  ],
  "optionalAddons": [
    { "item": "addon name", "benefit": "why it improves the dish" }
  ],
  "instructions": [
    "Step 1 instruction",
    "Step 2 instruction"
  ],
  "tips": [
    "Helpful tip 1",
    "Helpful tip 2"
  ],
  "substitutions": [
    { "original": "ingredient", "substitute": "alternative", "note": "why this works" }
  ]
}

Make recipes creative, practical, and delicious. Focus on using the provided ingredients while suggesting realistic add-ons."#;

/// System and user prompt for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn for_request(request: &RecipeRequest) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: user_prompt(request),
        }
    }
}

pub fn user_prompt(request: &RecipeRequest) -> String {
    let preferences = if request.dietary_preferences.is_empty() {
        NO_PREFERENCES.to_string()
    } else {
        request.dietary_preferences.join(LIST_SEPARATOR)
    };

    format!(
        "Create a {meal} recipe with these details:\n\
         - Available ingredients: {ingredients}\n\
         - Maximum cooking time: {time}\n\
         - Dietary preferences: {preferences}\n\
         \n\
         Generate a complete recipe that:\n\
         1. Uses most of the available ingredients\n\
         2. Can be prepared within the time limit\n\
         3. Respects dietary restrictions\n\
         4. Includes optional add-ons to enhance the dish\n\
         5. Provides clear step-by-step instructions",
        meal = request.meal_type,
        ingredients = request.ingredients.join(LIST_SEPARATOR),
        time = request.cooking_time,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(preferences: &[&str]) -> RecipeRequest {
        RecipeRequest {
            ingredients: vec!["egg".to_string(), "rice".to_string()],
            cooking_time: "30 minutes".to_string(),
            meal_type: "Dinner".to_string(),
            dietary_preferences: preferences.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_user_prompt_mentions_every_field() {
        let prompt = user_prompt(&request(&[]));
        for needle in ["egg", "rice", "30 minutes", "Dinner", "None"] {
            assert!(prompt.contains(needle), "missing {needle:?} in {prompt}");
        }
        assert!(prompt.starts_with("Create a Dinner recipe"));
        assert!(prompt.contains("- Available ingredients: egg, rice\n"));
    }

    #[test]
    fn test_user_prompt_joins_preferences() {
        let prompt = user_prompt(&request(&["Vegan", "Gluten-free"]));
        assert!(prompt.contains("- Dietary preferences: Vegan, Gluten-free\n"));
        assert!(!prompt.contains("None"));
    }

    #[test]
    fn test_user_prompt_lists_five_requirements() {
        let prompt = user_prompt(&request(&[]));
        assert!(prompt.contains("1. Uses most of the available ingredients"));
        assert!(prompt.contains("2. Can be prepared within the time limit"));
        assert!(prompt.contains("3. Respects dietary restrictions"));
        assert!(prompt.contains("4. Includes optional add-ons"));
        assert!(prompt.contains("5. Provides clear step-by-step instructions"));
    }

    #[test]
    fn test_system_prompt_names_schema_fields() {
        for field in [
            "\"title\"",
            "\"description\"",
            "\"cookingTime\"",
            "\"difficulty\"",
            "\"servings\"",
            "\"ingredients\"",
            "\"optionalAddons\"",
            "\"instructions\"",
            "\"tips\"",
            "\"substitutions\"",
        ] {
            assert!(SYSTEM_PROMPT.contains(field), "missing {field}");
        }
        assert!(SYSTEM_PROMPT.starts_with("You are an expert chef"));
    }
}
