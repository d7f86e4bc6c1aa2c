use std::io::Read;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Subcommand};

use kitchenbook_core::{confirmed, transfer, Store};

use super::OutputFormat;
use crate::prompt::StdinConfirm;

#[derive(Args)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand)]
pub enum DataSubcommand {
    /// Export everything as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a JSON export, replacing the sections it contains
    Import {
        /// File to read, or "-" for stdin
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Delete all recipes, orders, pantry items and meal plans
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Count stored records
    Stats {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl DataCommand {
    pub fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DataSubcommand::Export { output } => {
                let json = transfer::export(store, Utc::now())?.to_json()?;
                match output {
                    Some(path) => {
                        std::fs::write(path, json)?;
                        println!("Exported data to {}", path.display());
                    }
                    None => println!("{}", json),
                }
                Ok(())
            }

            DataSubcommand::Import { file, force } => {
                let json = if file.as_os_str() == "-" {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                } else {
                    std::fs::read_to_string(file)?
                };

                let written = confirmed(
                    &StdinConfirm::new(*force),
                    "Import data",
                    "Importing replaces the matching sections of the current data. Continue?",
                    || transfer::import(store, &json),
                )?;
                match written {
                    Some(keys) if keys.is_empty() => println!("Nothing to import"),
                    Some(keys) => {
                        let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
                        println!("Imported: {}", names.join(", "));
                    }
                    None => println!("Import cancelled."),
                }
                Ok(())
            }

            DataSubcommand::Clear { force } => {
                let cleared = confirmed(
                    &StdinConfirm::new(*force),
                    "Clear data",
                    "Delete all recipes, orders, pantry items and meal plans? This cannot be undone.",
                    || transfer::clear_all(store),
                )?;
                match cleared {
                    Some(()) => println!("All data cleared"),
                    None => println!("Cancelled."),
                }
                Ok(())
            }

            DataSubcommand::Stats { format } => {
                let stats = transfer::stats(store)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    }
                    OutputFormat::Text => println!("{}", stats),
                }
                Ok(())
            }
        }
    }
}
