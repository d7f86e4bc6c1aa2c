use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};

use kitchenbook_core::catalog::{self, RecipeFilter};
use kitchenbook_core::{
    confirmed, validate, Nutrition, Recipe, RecipeIngredient, RecipePatch, RecipeRepository, Step,
};
use kitchenbook_core::models::{DEFAULT_CATEGORIES, DIFFICULTIES};

use super::{truncate, OutputFormat};
use crate::prompt::StdinConfirm;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

/// Fields shared by `add` and `update`.
#[derive(Args)]
pub struct RecipeFields {
    /// Category (e.g. 家常菜, 汤类)
    #[arg(long)]
    category: Option<String>,

    /// Short description
    #[arg(long)]
    description: Option<String>,

    /// Cover image path
    #[arg(long)]
    image: Option<String>,

    /// Number of servings (1-100)
    #[arg(long)]
    servings: Option<u32>,

    /// Cook time (free text, e.g. "20分钟")
    #[arg(long)]
    cook_time: Option<String>,

    /// Difficulty
    #[arg(long, value_parser = PossibleValuesParser::new(DIFFICULTIES))]
    difficulty: Option<String>,

    /// Ingredient as NAME:AMOUNT (can be repeated)
    #[arg(long = "ingredient", value_name = "NAME:AMOUNT")]
    ingredients: Vec<String>,

    /// Cooking step (can be repeated, in order)
    #[arg(long = "step", value_name = "TEXT")]
    steps: Vec<String>,

    /// Calories per serving
    #[arg(long)]
    calories: Option<String>,

    /// Protein per serving
    #[arg(long)]
    protein: Option<String>,

    /// Fat per serving
    #[arg(long)]
    fat: Option<String>,

    /// Carbohydrates per serving
    #[arg(long)]
    carbs: Option<String>,
}

impl RecipeFields {
    fn ingredients(&self) -> Vec<RecipeIngredient> {
        self.ingredients.iter().map(|s| parse_ingredient(s)).collect()
    }

    fn steps(&self) -> Vec<Step> {
        self.steps.iter().map(Step::new).collect()
    }

    fn nutrition(&self) -> Option<Nutrition> {
        if self.calories.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
            && self.carbs.is_none()
        {
            return None;
        }
        Some(Nutrition {
            calories: self.calories.clone(),
            protein: self.protein.clone(),
            fat: self.fat.clone(),
            carbs: self.carbs.clone(),
        })
    }
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Add a new recipe
    Add {
        /// Name of the recipe
        name: String,

        #[command(flatten)]
        fields: RecipeFields,

        /// Mark as must-order
        #[arg(long)]
        required: bool,
    },

    /// List recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Search name, description and category
        #[arg(long, short)]
        search: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing recipe
    Update {
        /// Recipe ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Replacement fields; --ingredient and --step replace the whole list
        #[command(flatten)]
        fields: RecipeFields,

        /// Mark or unmark as must-order
        #[arg(long)]
        required: Option<bool>,

        /// Remove the nutrition block
        #[arg(long, conflicts_with_all = ["calories", "protein", "fat", "carbs"])]
        clear_nutrition: bool,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// List categories in use, then the suggested ones not yet used
    Categories,

    /// Pick a random recipe
    Random {
        /// Only pick from this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show recommended recipes, must-order dishes first
    Recommend {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl RecipeCommand {
    pub fn run(&self, repo: &RecipeRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Add {
                name,
                fields,
                required,
            } => {
                let mut recipe = Recipe::new(name.as_str())
                    .with_ingredients(fields.ingredients())
                    .with_steps(fields.steps())
                    .required(*required);

                if let Some(category) = &fields.category {
                    recipe = recipe.with_category(category);
                }
                if let Some(description) = &fields.description {
                    recipe = recipe.with_description(description);
                }
                if let Some(image) = &fields.image {
                    recipe.image = image.clone();
                }
                if let Some(servings) = fields.servings {
                    recipe = recipe.with_servings(servings);
                }
                if let Some(cook_time) = &fields.cook_time {
                    recipe = recipe.with_cook_time(cook_time);
                }
                if let Some(difficulty) = &fields.difficulty {
                    recipe = recipe.with_difficulty(difficulty);
                }
                if let Some(nutrition) = fields.nutrition() {
                    recipe = recipe.with_nutrition(nutrition);
                }

                let created = repo.add(validate::recipe(recipe)?)?;
                println!("Created recipe:");
                println!("ID: {}", created.id);
                print!("{}", created);
                Ok(())
            }

            RecipeSubcommand::List {
                format,
                search,
                category,
            } => {
                let recipes = repo.list()?;
                let mut filter = RecipeFilter::default();
                if let Some(keyword) = search {
                    filter = filter.keyword(keyword);
                }
                if let Some(category) = category {
                    filter = filter.category(category);
                }
                let matched = filter.apply(&recipes);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&matched)?);
                    }
                    OutputFormat::Text => {
                        if matched.is_empty() {
                            println!("No recipes found");
                            return Ok(());
                        }
                        print_table(&matched);
                        println!("\nTotal: {} recipe(s)", matched.len());

                        let categories = catalog::categories(&recipes);
                        if !categories.is_empty() {
                            println!("Categories: {}", categories.join(", "));
                        }
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { id, format } => {
                let recipe = find(repo, id)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    }
                    OutputFormat::Text => {
                        println!("ID: {}", recipe.id);
                        print!("{}", recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Update {
                id,
                name,
                fields,
                required,
                clear_nutrition,
            } => {
                let nutrition = if *clear_nutrition {
                    Some(None)
                } else {
                    fields.nutrition().map(Some)
                };
                let patch = RecipePatch {
                    name: name.clone(),
                    category: fields.category.clone(),
                    description: fields.description.clone(),
                    image: fields.image.clone(),
                    servings: fields.servings,
                    cook_time: fields.cook_time.clone(),
                    difficulty: fields.difficulty.clone(),
                    ingredients: (!fields.ingredients.is_empty()).then(|| fields.ingredients()),
                    steps: (!fields.steps.is_empty()).then(|| fields.steps()),
                    nutrition,
                    is_required: *required,
                };

                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let patch = validate::recipe_patch(patch)?;
                let updated = repo
                    .update(id, patch)?
                    .ok_or_else(|| format!("Recipe not found: {}", id))?;
                println!("Updated recipe:");
                print!("{}", updated);
                Ok(())
            }

            RecipeSubcommand::Delete { id, force } => {
                let recipe = find(repo, id)?;
                let deleted = confirmed(
                    &StdinConfirm::new(*force),
                    "Delete recipe",
                    &format!("Delete recipe '{}'?", recipe.name),
                    || repo.delete(id),
                )?;
                match deleted {
                    Some(_) => println!("Deleted recipe: {}", recipe.name),
                    None => println!("Deletion cancelled."),
                }
                Ok(())
            }

            RecipeSubcommand::Categories => {
                let recipes = repo.list()?;
                let used = catalog::categories(&recipes);
                for category in &used {
                    println!("{}", category);
                }
                let unused: Vec<&str> = DEFAULT_CATEGORIES
                    .iter()
                    .copied()
                    .filter(|c| !used.contains(c))
                    .collect();
                if !unused.is_empty() {
                    println!("\nSuggested: {}", unused.join(", "));
                }
                Ok(())
            }

            RecipeSubcommand::Random { category } => {
                let recipes = repo.list()?;
                let mut filter = RecipeFilter::default();
                if let Some(category) = category {
                    filter = filter.category(category);
                }
                let candidates = filter.apply(&recipes);

                match catalog::pick_random(&candidates) {
                    Some(recipe) => {
                        println!("ID: {}", recipe.id);
                        print!("{}", recipe);
                    }
                    None => println!("No recipes found"),
                }
                Ok(())
            }

            RecipeSubcommand::Recommend { format } => {
                let recipes = repo.list()?;
                let recommended = catalog::recommend(&recipes);
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recommended)?);
                    }
                    OutputFormat::Text => {
                        if recommended.is_empty() {
                            println!("No recipes found");
                            return Ok(());
                        }
                        print_table(&recommended);
                    }
                }
                Ok(())
            }
        }
    }
}

fn find(repo: &RecipeRepository, id: &str) -> Result<Recipe, Box<dyn std::error::Error>> {
    repo.get_by_id(id)?
        .ok_or_else(|| format!("Recipe not found: {}", id).into())
}

fn print_table(recipes: &[&Recipe]) {
    println!("{:<26}  {:<24}  {:<10}  MUST", "ID", "NAME", "CATEGORY");
    println!("{}", "-".repeat(70));
    for recipe in recipes {
        println!(
            "{:<26}  {:<24}  {:<10}  {}",
            recipe.id,
            truncate(&recipe.name, 24),
            truncate(&recipe.category, 10),
            if recipe.is_required { "*" } else { "" }
        );
    }
}

/// Splits "NAME:AMOUNT". Either an ASCII or a full-width colon separates
/// the two; without one the whole input is the name.
fn parse_ingredient(input: &str) -> RecipeIngredient {
    match input.split_once([':', '：']) {
        Some((name, amount)) => RecipeIngredient::new(name.trim(), amount.trim()),
        None => RecipeIngredient::new(input.trim(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient() {
        assert_eq!(
            parse_ingredient("鸡蛋:2个"),
            RecipeIngredient::new("鸡蛋", "2个")
        );
        assert_eq!(
            parse_ingredient("番茄：300g"),
            RecipeIngredient::new("番茄", "300g")
        );
        assert_eq!(parse_ingredient(" salt "), RecipeIngredient::new("salt", ""));
    }
}
