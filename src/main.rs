use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod prompt;

use commands::{
    ConfigCommand, DataCommand, OrderCommand, PantryCommand, PlanCommand, RecipeCommand,
    ShopCommand, UserCommand,
};
use config::Config;
use kitchenbook_core::{
    IngredientRepository, MealPlanRepository, OrderRepository, RecipeRepository, Session, Store,
};

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(version)]
#[command(about = "Recipes, pantry, meal plans and orders for a small kitchen", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe(RecipeCommand),

    /// Manage pantry stock
    Pantry(PantryCommand),

    /// Place and track orders
    Order(OrderCommand),

    /// Manage daily meal plans
    Plan(PlanCommand),

    /// Manage the shop profile, kitchens and admins
    Shop(ShopCommand),

    /// Sign in and show the current user
    User(UserCommand),

    /// Export, import and reset stored data
    Data(DataCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.value.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    tracing::debug!("Using data directory {}", config.data_dir.value.display());
    let store = Store::file(config.data_dir.value.clone());
    let open_session = || Session::open(store.clone(), config.admin_match.value);

    match command {
        Commands::Recipe(cmd) => {
            let repo = RecipeRepository::new(store.clone());
            cmd.run(&repo)?;
        }
        Commands::Pantry(cmd) => {
            let repo = IngredientRepository::new(store.clone());
            let recipes = RecipeRepository::new(store.clone());
            cmd.run(&repo, &recipes, &config)?;
        }
        Commands::Order(cmd) => {
            let session = open_session()?;
            let repo = OrderRepository::new(store.clone());
            let recipes = RecipeRepository::new(store.clone());
            cmd.run(&repo, &recipes, &session)?;
        }
        Commands::Plan(cmd) => {
            let session = open_session()?;
            let repo = MealPlanRepository::new(store.clone());
            let recipes = RecipeRepository::new(store.clone());
            let orders = OrderRepository::new(store.clone());
            cmd.run(&repo, &recipes, &orders, &session)?;
        }
        Commands::Shop(cmd) => {
            let mut session = open_session()?;
            cmd.run(&mut session)?;
        }
        Commands::User(cmd) => {
            let mut session = open_session()?;
            cmd.run(&mut session)?;
        }
        Commands::Data(cmd) => {
            cmd.run(&store)?;
        }
        Commands::Config(cmd) => {
            cmd.run(&config)?;
        }
    }

    Ok(())
}
