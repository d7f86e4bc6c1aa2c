//! Browsing queries over the recipe list.

use rand::seq::IndexedRandom;

use crate::models::Recipe;

/// Number of recipes shown as recommendations.
pub const RECOMMENDED_LIMIT: usize = 6;

/// Keyword and category filter for the recipe list.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
}

impl RecipeFilter {
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Case-insensitive keyword match on name, description or category;
    /// the category filter is exact.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(keyword) = self.keyword.as_deref().map(str::trim) {
            let keyword = keyword.to_lowercase();
            if !keyword.is_empty()
                && !recipe.name.to_lowercase().contains(&keyword)
                && !recipe.description.to_lowercase().contains(&keyword)
                && !recipe.category.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => recipe.category == category,
            _ => true,
        }
    }

    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct non-empty categories in the order they first appear.
pub fn categories(recipes: &[Recipe]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for recipe in recipes {
        let category = recipe.category.as_str();
        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

/// Must-order recipes first, then the rest, up to [`RECOMMENDED_LIMIT`].
pub fn recommend(recipes: &[Recipe]) -> Vec<&Recipe> {
    recipes
        .iter()
        .filter(|r| r.is_required)
        .chain(recipes.iter().filter(|r| !r.is_required))
        .take(RECOMMENDED_LIMIT)
        .collect()
}

/// Picks one recipe at random, or `None` from an empty list.
pub fn pick_random<'a>(recipes: &[&'a Recipe]) -> Option<&'a Recipe> {
    recipes.choose(&mut rand::rng()).copied()
}
