use clap::{Args, Subcommand};

use kitchenbook_core::ordering::{order_from_plan, place_order};
use kitchenbook_core::{
    confirmed, Meal, MealPlanRepository, OrderRepository, PlannedDish, RecipeRepository, Session,
    ValidationError,
};

use super::{date_or_today, today, OutputFormat};
use crate::prompt::StdinConfirm;

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// Show the plan for a day
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Plan a recipe for a meal
    Add {
        /// Recipe ID
        recipe_id: String,

        /// Meal (breakfast, lunch, dinner)
        #[arg(long, short)]
        meal: Meal,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Take a recipe off a meal
    Remove {
        /// Recipe ID
        recipe_id: String,

        /// Meal (breakfast, lunch, dinner)
        #[arg(long, short)]
        meal: Meal,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Empty every meal of a day
    Clear {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Summarize the plans for the next seven days
    Week,

    /// Order every dish of a day's plan
    Order {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Delete a day's plan
    Delete {
        /// Date (YYYY-MM-DD)
        #[arg(long, short)]
        date: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl PlanCommand {
    pub fn run(
        &self,
        repo: &MealPlanRepository,
        recipes: &RecipeRepository,
        orders: &OrderRepository,
        session: &Session,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlanSubcommand::Show { date, format } => {
                let date = date_or_today(date.as_deref())?;
                let plan = repo.get_by_date(date)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&plan)?);
                    }
                    OutputFormat::Text => match plan {
                        Some(plan) => print!("{}", plan),
                        None => println!("No meal plan for {}", date),
                    },
                }
                Ok(())
            }

            PlanSubcommand::Add {
                recipe_id,
                meal,
                date,
            } => {
                let date = date_or_today(date.as_deref())?;
                let recipe = recipes
                    .get_by_id(recipe_id)?
                    .ok_or_else(|| format!("Recipe not found: {}", recipe_id))?;

                let plan = repo.add_dish(date, *meal, PlannedDish::new(&recipe.id, &recipe.name))?;
                println!("Added '{}' to {} on {}", recipe.name, meal, date);
                print!("{}", plan);
                Ok(())
            }

            PlanSubcommand::Remove {
                recipe_id,
                meal,
                date,
            } => {
                let date = date_or_today(date.as_deref())?;
                let plan = repo
                    .remove_dish(date, *meal, recipe_id)?
                    .ok_or_else(|| format!("No meal plan for {}", date))?;
                println!("Updated meal plan:");
                print!("{}", plan);
                Ok(())
            }

            PlanSubcommand::Clear { date, force } => {
                let date = date_or_today(date.as_deref())?;
                let cleared = confirmed(
                    &StdinConfirm::new(*force),
                    "Clear meal plan",
                    &format!("Remove every dish planned for {}?", date),
                    || repo.clear(date),
                )?;
                match cleared {
                    Some(_) => println!("Cleared meal plan for {}", date),
                    None => println!("Cancelled."),
                }
                Ok(())
            }

            PlanSubcommand::Week => {
                let today = today();
                let week = repo.week_from(today)?;
                if week.is_empty() {
                    println!("Nothing planned for the next seven days");
                    return Ok(());
                }
                println!("{:<12}  {:<10}  DISHES", "DATE", "DAY");
                println!("{}", "-".repeat(32));
                for summary in &week {
                    let day = if summary.date == today {
                        "today".to_string()
                    } else {
                        summary.date.format("%A").to_string()
                    };
                    println!("{:<12}  {:<10}  {}", summary.date, day, summary.dish_count);
                }
                Ok(())
            }

            PlanSubcommand::Order { date } => {
                let date = date_or_today(date.as_deref())?;
                let plan = repo
                    .get_by_date(date)?
                    .ok_or_else(|| ValidationError::EmptyPlan(date.to_string()))?;

                let order = order_from_plan(session, &plan)?;
                let placed = place_order(session, orders, order)?;
                println!("Created order:");
                println!("ID: {}", placed.id);
                print!("{}", placed);
                Ok(())
            }

            PlanSubcommand::Delete { date, force } => {
                let date = kitchenbook_core::validate::date(date)?;
                if repo.get_by_date(date)?.is_none() {
                    return Err(format!("No meal plan for {}", date).into());
                }
                let deleted = confirmed(
                    &StdinConfirm::new(*force),
                    "Delete meal plan",
                    &format!("Delete the meal plan for {}?", date),
                    || repo.delete(date),
                )?;
                match deleted {
                    Some(_) => println!("Deleted meal plan: {}", date),
                    None => println!("Deletion cancelled."),
                }
                Ok(())
            }
        }
    }
}
