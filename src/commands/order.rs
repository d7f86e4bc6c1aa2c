use chrono::Utc;
use clap::{Args, Subcommand};

use kitchenbook_core::ordering::{order_for_recipe, place_order};
use kitchenbook_core::{Order, OrderRepository, OrderStatus, RecipeRepository, Session};

use super::{truncate, OutputFormat};

#[derive(Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub command: OrderSubcommand,
}

#[derive(Subcommand)]
pub enum OrderSubcommand {
    /// Order one serving of a recipe from the current kitchen
    Create {
        /// Recipe ID
        recipe_id: String,

        /// Note for the kitchen
        #[arg(long, short, default_value = "")]
        remark: String,
    },

    /// List orders, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Filter by status (pending, preparing, ready)
        #[arg(long, short)]
        status: Option<OrderStatus>,

        /// Only show the most recent N orders
        #[arg(long, value_name = "N", conflicts_with = "status")]
        recent: Option<usize>,
    },

    /// Show an order's details
    Show {
        /// Order ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Start preparing a pending order
    Accept {
        /// Order ID
        id: String,
    },

    /// Mark an order as ready
    Complete {
        /// Order ID
        id: String,
    },
}

impl OrderCommand {
    pub fn run(
        &self,
        repo: &OrderRepository,
        recipes: &RecipeRepository,
        session: &Session,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            OrderSubcommand::Create { recipe_id, remark } => {
                let recipe = recipes
                    .get_by_id(recipe_id)?
                    .ok_or_else(|| format!("Recipe not found: {}", recipe_id))?;

                let order = order_for_recipe(session, &recipe, remark);
                let placed = place_order(session, repo, order)?;
                println!("Created order:");
                println!("ID: {}", placed.id);
                print!("{}", placed);
                Ok(())
            }

            OrderSubcommand::List {
                format,
                status,
                recent,
            } => {
                let orders = match (status, recent) {
                    (Some(status), _) => repo.list_by_status(*status)?,
                    (None, Some(limit)) => repo.recent(*limit)?,
                    (None, None) => repo.list()?,
                };

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&orders)?);
                    }
                    OutputFormat::Text => {
                        if orders.is_empty() {
                            println!("No orders found");
                            return Ok(());
                        }

                        println!(
                            "{:<26}  {:<17}  {:<10}  {:<16}  ITEMS",
                            "ID", "ORDER NO", "STATUS", "CUSTOMER"
                        );
                        println!("{}", "-".repeat(85));
                        for order in &orders {
                            println!(
                                "{:<26}  {:<17}  {:<10}  {:<16}  {}",
                                order.id,
                                order.order_no,
                                order.status,
                                truncate(&order.customer_name, 16),
                                order.total_quantity()
                            );
                        }
                        println!("\nTotal: {} order(s)", orders.len());
                    }
                }
                Ok(())
            }

            OrderSubcommand::Show { id, format } => {
                let order = find(repo, id)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&order)?);
                    }
                    OutputFormat::Text => {
                        println!("ID: {}", order.id);
                        print!("{}", order);
                    }
                }
                Ok(())
            }

            OrderSubcommand::Accept { id } => {
                let order = find(repo, id)?;
                if order.status != OrderStatus::Pending {
                    return Err(format!(
                        "Order {} is {}, only pending orders can be accepted",
                        order.order_no, order.status
                    )
                    .into());
                }
                let updated = repo
                    .accept(id)?
                    .ok_or_else(|| format!("Order not found: {}", id))?;
                println!("Accepted order:");
                print!("{}", updated);
                Ok(())
            }

            OrderSubcommand::Complete { id } => {
                let order = find(repo, id)?;
                if order.status.next().is_none() {
                    return Err(format!(
                        "Order {} is {} and cannot be completed",
                        order.order_no, order.status
                    )
                    .into());
                }
                let updated = repo
                    .complete(id, Utc::now())?
                    .ok_or_else(|| format!("Order not found: {}", id))?;
                println!("Completed order:");
                print!("{}", updated);
                Ok(())
            }
        }
    }
}

fn find(repo: &OrderRepository, id: &str) -> Result<Order, Box<dyn std::error::Error>> {
    repo.get_by_id(id)?
        .ok_or_else(|| format!("Order not found: {}", id).into())
}
