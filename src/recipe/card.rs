//! Plain-text recipe card.

use std::fmt;

use crate::recipe::model::Recipe;

/// Terminal card for a recipe: header, then one section per tab.
pub struct RecipeCard<'a>(pub &'a Recipe);

impl fmt::Display for RecipeCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = self.0;

        writeln!(f, "{}", recipe.title)?;
        writeln!(f, "{}", "=".repeat(recipe.title.chars().count().max(1)))?;
        if !recipe.description.is_empty() {
            writeln!(f, "{}", recipe.description)?;
        }
        writeln!(
            f,
            "Time: {} | Difficulty: {} | Serves: {}",
            recipe.cooking_time,
            recipe.difficulty_level(),
            recipe.servings
        )?;

        section(f, "Ingredients")?;
        for ingredient in recipe.required_ingredients() {
            writeln!(f, "  - {} {}", ingredient.amount, ingredient.item)?;
        }
        let mut optional = recipe.optional_ingredients().peekable();
        if optional.peek().is_some() {
            writeln!(f, "  Optional:")?;
            for ingredient in optional {
                writeln!(f, "  - {} {}", ingredient.amount, ingredient.item)?;
            }
        }

        section(f, "Instructions")?;
        for (step, instruction) in recipe.instructions.iter().enumerate() {
            writeln!(f, "  {}. {}", step + 1, instruction)?;
        }

        section(f, "Add-ons")?;
        match recipe.optional_addons.as_deref() {
            Some(addons) if !addons.is_empty() => {
                for addon in addons {
                    writeln!(f, "  + {}: {}", addon.item, addon.benefit)?;
                }
            }
            _ => writeln!(f, "  No add-ons suggested")?,
        }

        if let Some(tips) = recipe.tips.as_deref().filter(|t| !t.is_empty()) {
            section(f, "Tips")?;
            for tip in tips {
                writeln!(f, "  * {tip}")?;
            }
        }

        if let Some(subs) = recipe.substitutions.as_deref().filter(|s| !s.is_empty()) {
            section(f, "Substitutions")?;
            for sub in subs {
                writeln!(f, "  {} -> {} ({})", sub.original, sub.substitute, sub.note)?;
            }
        }

        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    writeln!(f, "\n{name}:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_full_card() {
        let recipe = Recipe::from_value(json!({
            "title": "Egg Fried Rice",
            "description": "Quick and comforting",
            "cookingTime": "20 minutes",
            "difficulty": "easy",
            "servings": 2,
            "ingredients": [
                { "item": "rice", "amount": "2 cups", "optional": false },
                { "item": "scallions", "amount": "2", "optional": true }
            ],
            "optionalAddons": [{ "item": "chili oil", "benefit": "heat" }],
            "instructions": ["Cook the rice", "Scramble the eggs"],
            "tips": ["Use day-old rice"],
            "substitutions": [{ "original": "rice", "substitute": "quinoa", "note": "more protein" }]
        }))
        .unwrap();

        let card = RecipeCard(&recipe).to_string();
        assert!(card.starts_with("Egg Fried Rice\n==============\n"));
        assert!(card.contains("Time: 20 minutes | Difficulty: Easy | Serves: 2"));
        assert!(card.contains("  - 2 cups rice\n  Optional:\n  - 2 scallions\n"));
        assert!(card.contains("  1. Cook the rice\n  2. Scramble the eggs\n"));
        assert!(card.contains("  + chili oil: heat"));
        assert!(card.contains("  * Use day-old rice"));
        assert!(card.contains("  rice -> quinoa (more protein)"));
    }

    #[test]
    fn test_render_without_optional_sections() {
        let recipe = Recipe::from_value(json!({
            "title": "Toast",
            "difficulty": "Trivial",
            "ingredients": [{ "item": "bread", "amount": "1 slice" }],
            "instructions": ["Toast it"]
        }))
        .unwrap();

        let card = RecipeCard(&recipe).to_string();
        assert!(card.contains("Difficulty: Unknown"));
        assert!(card.contains("No add-ons suggested"));
        assert!(!card.contains("Tips:"));
        assert!(!card.contains("Substitutions:"));
        assert!(!card.contains("Optional:"));
    }
}
