use clap::{Args, Subcommand};

use kitchenbook_core::{
    confirmed, match_recipes_by_ingredients, sort_by_expiry, validate, ExpiryStatus, Ingredient,
    IngredientPatch, IngredientRepository, RecipeRepository,
};

use super::{today, truncate, OutputFormat};
use crate::config::Config;
use crate::prompt::StdinConfirm;

#[derive(Args)]
pub struct PantryCommand {
    #[command(subcommand)]
    pub command: PantrySubcommand,
}

#[derive(Subcommand)]
pub enum PantrySubcommand {
    /// Add an item to the pantry
    Add {
        /// Ingredient name
        name: String,

        /// Amount in stock
        #[arg(long, short, default_value = "0")]
        quantity: String,

        /// Unit of measurement
        #[arg(long, short, default_value = "")]
        unit: String,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long, short)]
        expires: Option<String>,
    },

    /// List pantry items, soonest expiry first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show expired or soon-expiring items
        #[arg(long)]
        expiring: bool,
    },

    /// Update a pantry item
    Update {
        /// Item ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New quantity
        #[arg(long, short)]
        quantity: Option<String>,

        /// New unit
        #[arg(long, short)]
        unit: Option<String>,

        /// New expiry date (YYYY-MM-DD); an empty value clears it
        #[arg(long, short)]
        expires: Option<String>,
    },

    /// Remove an item from the pantry
    Delete {
        /// Item ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// List recipes whose ingredients are all in stock
    Cookable {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl PantryCommand {
    pub fn run(
        &self,
        repo: &IngredientRepository,
        recipes: &RecipeRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PantrySubcommand::Add {
                name,
                quantity,
                unit,
                expires,
            } => {
                let mut item =
                    Ingredient::new(name.as_str(), validate::quantity(quantity)?, unit.as_str());
                item.expiry_date = match expires {
                    Some(date) => validate::expiry_date(date)?,
                    None => None,
                };

                let created = repo.add(validate::ingredient(item)?)?;
                println!("Added to pantry:");
                println!("ID: {}", created.id);
                println!("{}", created);
                Ok(())
            }

            PantrySubcommand::List { format, expiring } => {
                let warning_days = config.expiry_warning_days.value;
                let today = today();

                let mut items = repo.list()?;
                sort_by_expiry(&mut items);
                if *expiring {
                    items.retain(|i| ExpiryStatus::of(i, today, warning_days).needs_attention());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Text => {
                        if items.is_empty() {
                            println!("No pantry items found");
                            return Ok(());
                        }

                        println!(
                            "{:<26}  {:<20}  {:<12}  {:<10}  STATUS",
                            "ID", "NAME", "QUANTITY", "EXPIRES"
                        );
                        println!("{}", "-".repeat(90));
                        for item in &items {
                            let quantity = match item.quantity {
                                Some(q) => format!("{} {}", q, item.unit),
                                None => "-".to_string(),
                            };
                            let expires = item
                                .expiry_date
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "-".to_string());
                            let status = ExpiryStatus::of(item, today, warning_days);
                            let marker = if status.needs_attention() { "!" } else { "" };
                            println!(
                                "{:<26}  {:<20}  {:<12}  {:<10}  {}{}",
                                item.id,
                                truncate(&item.name, 20),
                                truncate(quantity.trim(), 12),
                                expires,
                                status,
                                marker
                            );
                        }
                        println!("\nTotal: {} item(s)", items.len());
                    }
                }
                Ok(())
            }

            PantrySubcommand::Update {
                id,
                name,
                quantity,
                unit,
                expires,
            } => {
                let patch = IngredientPatch {
                    name: name.clone(),
                    quantity: quantity.as_deref().map(validate::quantity).transpose()?,
                    unit: unit.clone(),
                    expiry_date: expires
                        .as_deref()
                        .map(validate::expiry_date)
                        .transpose()?,
                };

                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let patch = validate::ingredient_patch(patch)?;
                let updated = repo
                    .update(id, patch)?
                    .ok_or_else(|| format!("Pantry item not found: {}", id))?;
                println!("Updated pantry item:");
                println!("{}", updated);
                Ok(())
            }

            PantrySubcommand::Delete { id, force } => {
                let item = repo
                    .get_by_id(id)?
                    .ok_or_else(|| format!("Pantry item not found: {}", id))?;
                let deleted = confirmed(
                    &StdinConfirm::new(*force),
                    "Delete pantry item",
                    &format!("Remove '{}' from the pantry?", item.name),
                    || repo.delete(id),
                )?;
                match deleted {
                    Some(_) => println!("Deleted pantry item: {}", item.name),
                    None => println!("Deletion cancelled."),
                }
                Ok(())
            }

            PantrySubcommand::Cookable { format } => {
                let all = recipes.list()?;
                let stock = repo.list()?;
                let cookable = match_recipes_by_ingredients(&all, &stock);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&cookable)?);
                    }
                    OutputFormat::Text => {
                        if cookable.is_empty() {
                            println!("Nothing can be cooked with the current pantry");
                            return Ok(());
                        }
                        for recipe in &cookable {
                            println!("{:<26}  {}", recipe.id, recipe.name);
                        }
                        println!("\nTotal: {} recipe(s)", cookable.len());
                    }
                }
                Ok(())
            }
        }
    }
}
