use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::loose;
use crate::id::generate_id;

/// Recipe categories offered when creating a recipe.
pub const DEFAULT_CATEGORIES: [&str; 13] = [
    "家常菜", "川菜", "粤菜", "湘菜", "鲁菜", "苏菜", "浙菜", "闽菜", "徽菜", "汤品", "甜品", "小吃",
    "其他",
];

/// Difficulty levels offered when creating a recipe.
pub const DIFFICULTIES: [&str; 3] = ["简单", "中等", "困难"];

/// One line of a recipe's ingredient list.
///
/// Stored data may hold either a bare name or a `{name, amount}` object;
/// both read into this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "IngredientEntry")]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    Plain(String),
    Structured {
        #[serde(default, deserialize_with = "loose::string_or_null")]
        name: String,
        #[serde(default, deserialize_with = "loose::string_or_number")]
        amount: Option<String>,
    },
}

impl From<IngredientEntry> for RecipeIngredient {
    fn from(entry: IngredientEntry) -> Self {
        match entry {
            IngredientEntry::Plain(name) => RecipeIngredient::new(name, ""),
            IngredientEntry::Structured { name, amount } => {
                RecipeIngredient::new(name, amount.unwrap_or_default())
            }
        }
    }
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amount.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.amount)
        }
    }
}

/// A preparation step, stored as a bare string or `{text, image}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StepEntry")]
pub struct Step {
    pub text: String,
    pub image: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepEntry {
    Plain(String),
    Structured {
        #[serde(default, deserialize_with = "loose::string_or_null")]
        text: String,
        #[serde(default, deserialize_with = "loose::string_or_null")]
        image: String,
    },
}

impl From<StepEntry> for Step {
    fn from(entry: StepEntry) -> Self {
        match entry {
            StepEntry::Plain(text) => Step::new(text),
            StepEntry::Structured { text, image } => Step { text, image },
        }
    }
}

impl Step {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Nutrition facts as entered; values are free text such as `"320"` or `"12g"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrition {
    #[serde(
        default,
        deserialize_with = "loose::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub calories: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub protein: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fat: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub carbs: Option<String>,
}

impl Nutrition {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none() && self.protein.is_none() && self.fat.is_none() && self.carbs.is_none()
    }

    /// Labelled rows for display, `-` standing in for missing values.
    pub fn rows(&self) -> [(&'static str, &str); 4] {
        fn or_dash(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("-")
        }
        [
            ("热量", or_dash(&self.calories)),
            ("蛋白质", or_dash(&self.protein)),
            ("脂肪", or_dash(&self.fat)),
            ("碳水", or_dash(&self.carbs)),
        ]
    }
}

fn default_servings() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub category: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub description: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub image: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub difficulty: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "Utc::now")]
    pub create_time: DateTime<Utc>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            category: String::new(),
            description: String::new(),
            image: String::new(),
            servings: 1,
            cook_time: String::new(),
            difficulty: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            nutrition: None,
            is_required: false,
            create_time: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<RecipeIngredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = servings;
        self
    }

    pub fn with_cook_time(mut self, cook_time: impl Into<String>) -> Self {
        self.cook_time = cook_time.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = Some(nutrition);
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count().max(4)))?;

        if !self.category.is_empty() {
            writeln!(f, "Category: {}", self.category)?;
        }
        writeln!(f, "Servings: {}", self.servings)?;
        if !self.cook_time.is_empty() {
            writeln!(f, "Cook time: {}", self.cook_time)?;
        }
        if !self.difficulty.is_empty() {
            writeln!(f, "Difficulty: {}", self.difficulty)?;
        }
        if self.is_required {
            writeln!(f, "Must-order: yes")?;
        }
        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if !self.steps.is_empty() {
            writeln!(f, "\nSteps:")?;
            for (i, step) in self.steps.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step.text)?;
            }
        }

        if let Some(nutrition) = &self.nutrition {
            writeln!(f, "\nNutrition:")?;
            for (label, value) in nutrition.rows() {
                writeln!(f, "  {}: {}", label, value)?;
            }
        }

        Ok(())
    }
}

/// Top-level fields to overwrite on an existing recipe.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub servings: Option<u32>,
    pub cook_time: Option<String>,
    pub difficulty: Option<String>,
    pub ingredients: Option<Vec<RecipeIngredient>>,
    pub steps: Option<Vec<Step>>,
    pub nutrition: Option<Option<Nutrition>>,
    pub is_required: Option<bool>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.servings.is_none()
            && self.cook_time.is_none()
            && self.difficulty.is_none()
            && self.ingredients.is_none()
            && self.steps.is_none()
            && self.nutrition.is_none()
            && self.is_required.is_none()
    }

    pub fn apply(self, recipe: &mut Recipe) {
        if let Some(name) = self.name {
            recipe.name = name;
        }
        if let Some(category) = self.category {
            recipe.category = category;
        }
        if let Some(description) = self.description {
            recipe.description = description;
        }
        if let Some(image) = self.image {
            recipe.image = image;
        }
        if let Some(servings) = self.servings {
            recipe.servings = servings;
        }
        if let Some(cook_time) = self.cook_time {
            recipe.cook_time = cook_time;
        }
        if let Some(difficulty) = self.difficulty {
            recipe.difficulty = difficulty;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(steps) = self.steps {
            recipe.steps = steps;
        }
        if let Some(nutrition) = self.nutrition {
            recipe.nutrition = nutrition;
        }
        if let Some(is_required) = self.is_required {
            recipe.is_required = is_required;
        }
    }
}
