//! Input checks applied before anything reaches a repository.
//!
//! Each function trims and normalizes its input and either returns the
//! cleaned value or the first rule it breaks. Lengths count characters,
//! not bytes.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{
    parse_date, Ingredient, IngredientPatch, Nutrition, Recipe, RecipeIngredient, RecipePatch,
    ShopInfo, Step,
};

pub const RECIPE_NAME_MAX: usize = 50;
pub const INGREDIENT_NAME_MAX: usize = 50;
pub const UNIT_MAX: usize = 20;
pub const SHOP_NAME_MAX: usize = 30;
pub const INTRO_MAX: usize = 200;
pub const SERVINGS_MAX: u32 = 100;

fn required_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    optional_text(value, field, max)
}

fn optional_text(value: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_string())
}

fn servings(servings: u32) -> Result<u32, ValidationError> {
    if (1..=SERVINGS_MAX).contains(&servings) {
        Ok(servings)
    } else {
        Err(ValidationError::ServingsOutOfRange(servings))
    }
}

fn ingredients(list: Vec<RecipeIngredient>) -> Result<Vec<RecipeIngredient>, ValidationError> {
    let list: Vec<RecipeIngredient> = list
        .into_iter()
        .map(|i| RecipeIngredient::new(i.name.trim(), i.amount.trim()))
        .filter(|i| !i.name.is_empty())
        .collect();
    if list.is_empty() {
        return Err(ValidationError::NoIngredients);
    }
    Ok(list)
}

fn steps(list: Vec<Step>) -> Result<Vec<Step>, ValidationError> {
    let list: Vec<Step> = list
        .into_iter()
        .map(|s| Step::new(s.text.trim()).with_image(s.image))
        .filter(|s| !s.text.is_empty())
        .collect();
    if list.is_empty() {
        return Err(ValidationError::NoSteps);
    }
    Ok(list)
}

/// Trims every nutrition value and drops the block when nothing is left.
pub fn nutrition(nutrition: Option<Nutrition>) -> Option<Nutrition> {
    fn clean(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    let nutrition = nutrition?;
    let nutrition = Nutrition {
        calories: clean(nutrition.calories),
        protein: clean(nutrition.protein),
        fat: clean(nutrition.fat),
        carbs: clean(nutrition.carbs),
    };
    if nutrition.is_empty() {
        None
    } else {
        Some(nutrition)
    }
}

/// Normalizes a new recipe and checks its invariants.
pub fn recipe(mut recipe: Recipe) -> Result<Recipe, ValidationError> {
    recipe.name = required_text(&recipe.name, "Recipe name", RECIPE_NAME_MAX)?;
    recipe.category = recipe.category.trim().to_string();
    recipe.description = recipe.description.trim().to_string();
    recipe.cook_time = recipe.cook_time.trim().to_string();
    recipe.difficulty = recipe.difficulty.trim().to_string();
    recipe.ingredients = ingredients(recipe.ingredients)?;
    recipe.steps = steps(recipe.steps)?;
    recipe.servings = servings(recipe.servings)?;
    recipe.nutrition = nutrition(recipe.nutrition);
    Ok(recipe)
}

/// Checks only the fields present in a recipe patch.
pub fn recipe_patch(mut patch: RecipePatch) -> Result<RecipePatch, ValidationError> {
    if let Some(name) = patch.name.as_deref() {
        patch.name = Some(required_text(name, "Recipe name", RECIPE_NAME_MAX)?);
    }
    patch.category = patch.category.map(|c| c.trim().to_string());
    patch.description = patch.description.map(|d| d.trim().to_string());
    patch.cook_time = patch.cook_time.map(|c| c.trim().to_string());
    patch.difficulty = patch.difficulty.map(|d| d.trim().to_string());
    if let Some(list) = patch.ingredients.take() {
        patch.ingredients = Some(ingredients(list)?);
    }
    if let Some(list) = patch.steps.take() {
        patch.steps = Some(steps(list)?);
    }
    if let Some(n) = patch.servings {
        patch.servings = Some(servings(n)?);
    }
    patch.nutrition = patch.nutrition.map(nutrition);
    Ok(patch)
}

/// Parses a quantity typed by the user. It must be a finite number `>= 0`.
pub fn quantity(input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity)?;
    check_quantity(value)
}

fn check_quantity(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidQuantity)
    }
}

/// Parses an expiry date; an empty input means no expiry.
pub fn expiry_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    parse_date(input)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))
}

/// Parses a required calendar date.
pub fn date(input: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(input).ok_or_else(|| ValidationError::InvalidDate(input.trim().to_string()))
}

/// Checks a new pantry item. New items always carry a counted quantity;
/// untracked stock only comes from older or imported data.
pub fn ingredient(mut ingredient: Ingredient) -> Result<Ingredient, ValidationError> {
    ingredient.name = required_text(&ingredient.name, "Ingredient name", INGREDIENT_NAME_MAX)?;
    ingredient.unit = optional_text(&ingredient.unit, "Unit", UNIT_MAX)?;
    let q = ingredient.quantity.ok_or(ValidationError::InvalidQuantity)?;
    ingredient.quantity = Some(check_quantity(q)?);
    Ok(ingredient)
}

pub fn ingredient_patch(mut patch: IngredientPatch) -> Result<IngredientPatch, ValidationError> {
    if let Some(name) = patch.name.as_deref() {
        patch.name = Some(required_text(name, "Ingredient name", INGREDIENT_NAME_MAX)?);
    }
    if let Some(unit) = patch.unit.as_deref() {
        patch.unit = Some(optional_text(unit, "Unit", UNIT_MAX)?);
    }
    if let Some(q) = patch.quantity {
        patch.quantity = Some(check_quantity(q)?);
    }
    Ok(patch)
}

/// Checks a shop profile before it is saved and repairs its kitchen
/// selection.
pub fn shop(mut shop: ShopInfo) -> Result<ShopInfo, ValidationError> {
    shop.name = required_text(&shop.name, "Shop name", SHOP_NAME_MAX)?;
    shop.intro = optional_text(&shop.intro, "Intro", INTRO_MAX)?;
    if shop.kitchens.is_empty() {
        return Err(ValidationError::NoKitchens);
    }
    if shop.repair() {
        tracing::warn!(
            "Repaired kitchen selection for shop '{}', current kitchen is now '{}'",
            shop.id,
            shop.current_kitchen_id
        );
    }
    Ok(shop)
}

pub fn kitchen_name(name: &str) -> Result<String, ValidationError> {
    required_text(name, "Kitchen name", SHOP_NAME_MAX)
}
