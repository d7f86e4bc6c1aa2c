//! Which recipes can be cooked from what is in the pantry.

use std::collections::HashSet;

use crate::models::{Ingredient, Recipe};

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Exact match, or either name contained in the other.
fn names_match(required: &str, available: &str) -> bool {
    required == available || available.contains(required) || required.contains(available)
}

/// Returns the recipes whose every ingredient matches something in stock,
/// in the order they were given.
///
/// Items with a zero quantity are not in stock; items without a quantity
/// always are. A recipe with no named ingredients never matches.
pub fn match_recipes_by_ingredients<'a>(
    recipes: &'a [Recipe],
    ingredients: &[Ingredient],
) -> Vec<&'a Recipe> {
    if recipes.is_empty() || ingredients.is_empty() {
        return Vec::new();
    }

    let available: HashSet<String> = ingredients
        .iter()
        .filter(|i| i.in_stock())
        .map(|i| normalize(&i.name))
        .filter(|name| !name.is_empty())
        .collect();
    if available.is_empty() {
        return Vec::new();
    }

    recipes
        .iter()
        .filter(|recipe| {
            let required: Vec<String> = recipe
                .ingredients
                .iter()
                .map(|i| normalize(&i.name))
                .filter(|name| !name.is_empty())
                .collect();

            !required.is_empty()
                && required
                    .iter()
                    .all(|need| available.iter().any(|have| names_match(need, have)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeIngredient;

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(name).with_ingredients(
            ingredients
                .iter()
                .map(|n| RecipeIngredient::new(*n, ""))
                .collect(),
        )
    }

    fn names(matched: Vec<&Recipe>) -> Vec<&str> {
        matched.into_iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_matches_only_makeable_recipes() {
        let recipes = vec![recipe("蒸蛋", &["鸡蛋"]), recipe("炖牛肉", &["牛肉"])];
        let stock = vec![Ingredient::new("鸡蛋", 2.0, "个")];

        assert_eq!(
            names(match_recipes_by_ingredients(&recipes, &stock)),
            vec!["蒸蛋"]
        );
    }

    #[test]
    fn test_zero_quantity_is_not_in_stock() {
        let recipes = vec![recipe("土豆丝", &["土豆"])];
        let stock = vec![Ingredient::new("土豆", 0.0, "个")];

        assert!(match_recipes_by_ingredients(&recipes, &stock).is_empty());
    }

    #[test]
    fn test_stored_null_quantity_is_not_in_stock() {
        let recipes = vec![recipe("土豆丝", &["土豆"])];
        let stock: Vec<Ingredient> =
            serde_json::from_str(r#"[{"id": "i1", "name": "土豆", "quantity": null}]"#).unwrap();

        assert_eq!(stock[0].quantity, Some(0.0));
        assert!(match_recipes_by_ingredients(&recipes, &stock).is_empty());
    }

    #[test]
    fn test_untracked_quantity_is_in_stock() {
        let recipes = vec![recipe("土豆丝", &["土豆"])];
        let mut potato = Ingredient::new("土豆", 1.0, "");
        potato.quantity = None;

        assert_eq!(match_recipes_by_ingredients(&recipes, &[potato]).len(), 1);
    }

    #[test]
    fn test_every_ingredient_must_match() {
        let recipes = vec![recipe("番茄炒蛋", &["番茄", "鸡蛋"])];
        let stock = vec![Ingredient::new("鸡蛋", 2.0, "个")];

        assert!(match_recipes_by_ingredients(&recipes, &stock).is_empty());
    }

    #[test]
    fn test_substring_match_both_ways() {
        let recipes = vec![
            recipe("A", &["egg"]),
            recipe("B", &["free range eggs"]),
            recipe("C", &["milk"]),
        ];
        let stock = vec![
            Ingredient::new("  Eggs ", 6.0, ""),
            Ingredient::new("range", 1.0, ""),
        ];

        // "egg" is inside "eggs"; "range" is inside "free range eggs".
        assert_eq!(
            names(match_recipes_by_ingredients(&recipes, &stock)),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_recipe_without_ingredients_never_matches() {
        let recipes = vec![recipe("Air", &[]), recipe("Blank", &["  "])];
        let stock = vec![Ingredient::new("salt", 1.0, "")];

        assert!(match_recipes_by_ingredients(&recipes, &stock).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let recipes = vec![recipe("蒸蛋", &["鸡蛋"])];
        let stock = vec![Ingredient::new("鸡蛋", 2.0, "个")];

        assert!(match_recipes_by_ingredients(&[], &stock).is_empty());
        assert!(match_recipes_by_ingredients(&recipes, &[]).is_empty());
    }

    #[test]
    fn test_output_keeps_input_order() {
        let recipes = vec![
            recipe("C", &["rice"]),
            recipe("A", &["rice"]),
            recipe("B", &["rice"]),
        ];
        let stock = vec![Ingredient::new("rice", 1.0, "kg")];

        assert_eq!(
            names(match_recipes_by_ingredients(&recipes, &stock)),
            vec!["C", "A", "B"]
        );
    }
}
