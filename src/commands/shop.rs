use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use kitchenbook_core::{confirmed, ProfilePatch, Session, ShopImage, ShopInfo};

use super::OutputFormat;
use crate::prompt::{PathImagePicker, StdinConfirm};

#[derive(Args)]
pub struct ShopCommand {
    #[command(subcommand)]
    pub command: ShopSubcommand,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum ShopSubcommand {
    /// Show the shop profile and its kitchens
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update the shop profile
    Update {
        /// New shop name
        #[arg(long)]
        name: Option<String>,

        /// New introduction
        #[arg(long)]
        intro: Option<String>,

        /// Avatar image file
        #[arg(long)]
        avatar: Option<PathBuf>,

        /// Background image file
        #[arg(long)]
        background: Option<PathBuf>,
    },

    /// Add a kitchen
    KitchenAdd {
        /// Kitchen name
        name: String,
    },

    /// Make a kitchen the current one
    KitchenSwitch {
        /// Kitchen ID
        id: String,
    },

    /// Delete a kitchen
    KitchenDelete {
        /// Kitchen ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Add the signed-in user as an admin
    AdminAdd {
        /// Kitchen ID, defaults to the current kitchen
        #[arg(long, short)]
        kitchen: Option<String>,
    },

    /// Remove an admin by position in the kitchen's roster
    AdminRemove {
        /// Position in the roster, starting at 0
        index: usize,

        /// Kitchen ID, defaults to the current kitchen
        #[arg(long, short)]
        kitchen: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Turn new-order notifications on or off
    Notify {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShopView<'a> {
    #[serde(flatten)]
    shop: &'a ShopInfo,
    notification_enabled: bool,
}

impl ShopCommand {
    pub fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ShopSubcommand::Show { format } => {
                let notification_enabled = session.notifications_enabled()?;
                match format {
                    OutputFormat::Json => {
                        let view = ShopView {
                            shop: session.shop(),
                            notification_enabled,
                        };
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", session.shop());
                        if let Some(kitchen) = session.current_kitchen() {
                            println!("\nAdmins of {}:", kitchen.name);
                            if kitchen.admins.is_empty() {
                                println!("  (none)");
                            }
                            for (i, admin) in kitchen.admins.iter().enumerate() {
                                println!("  {}. {} ({})", i, admin.nick_name, admin.openid);
                            }
                        }
                        println!(
                            "\nNotifications: {}",
                            if notification_enabled { "on" } else { "off" }
                        );
                    }
                }
                Ok(())
            }

            ShopSubcommand::Update {
                name,
                intro,
                avatar,
                background,
            } => {
                if name.is_none() && intro.is_none() && avatar.is_none() && background.is_none() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let patch = ProfilePatch {
                    name: name.clone(),
                    intro: intro.clone(),
                    ..Default::default()
                };
                if !patch.is_empty() {
                    session.update_profile(patch)?;
                }
                for (target, path) in [
                    (ShopImage::Avatar, avatar),
                    (ShopImage::Background, background),
                ] {
                    if path.is_none() {
                        continue;
                    }
                    let picker = PathImagePicker::new(path.clone());
                    if !session.choose_image(target, &picker)? {
                        println!("No image picked for {:?}, keeping the old one", target);
                    }
                }

                println!("Updated shop:");
                print!("{}", session.shop());
                Ok(())
            }

            ShopSubcommand::KitchenAdd { name } => {
                let kitchen = session.add_kitchen(name)?;
                println!("Created kitchen: {} [{}]", kitchen.name, kitchen.id);
                Ok(())
            }

            ShopSubcommand::KitchenSwitch { id } => {
                if !session.switch_kitchen(id)? {
                    return Err(format!("Kitchen not found: {}", id).into());
                }
                println!("Current kitchen: {}", id);
                Ok(())
            }

            ShopSubcommand::KitchenDelete { id, force } => {
                let name = session
                    .shop()
                    .kitchen(id)
                    .map(|k| k.name.clone())
                    .ok_or_else(|| format!("Kitchen not found: {}", id))?;
                let deleted = confirmed(
                    &StdinConfirm::new(*force),
                    "Delete kitchen",
                    &format!("Delete kitchen '{}'?", name),
                    || session.delete_kitchen(id),
                )?;
                match deleted {
                    Some(kitchen) => println!("Deleted kitchen: {}", kitchen.name),
                    None => println!("Deletion cancelled."),
                }
                Ok(())
            }

            ShopSubcommand::AdminAdd { kitchen } => {
                let kitchen_id = kitchen_or_current(session, kitchen.as_deref())?;
                let admin = session.add_admin(&kitchen_id)?;
                println!("Added admin: {} ({})", admin.nick_name, admin.openid);
                Ok(())
            }

            ShopSubcommand::AdminRemove {
                index,
                kitchen,
                force,
            } => {
                let kitchen_id = kitchen_or_current(session, kitchen.as_deref())?;
                let removed = confirmed(
                    &StdinConfirm::new(*force),
                    "Remove admin",
                    &format!("Remove admin #{} from this kitchen?", index),
                    || session.remove_admin(&kitchen_id, *index),
                )?;
                match removed {
                    Some(Some(admin)) => println!("Removed admin: {}", admin.nick_name),
                    Some(None) => return Err(format!("No admin at position {}", index).into()),
                    None => println!("Cancelled."),
                }
                Ok(())
            }

            ShopSubcommand::Notify { state } => {
                let enabled = matches!(state, Toggle::On);
                session.set_notifications_enabled(enabled)?;
                println!(
                    "Notifications turned {}",
                    if enabled { "on" } else { "off" }
                );
                Ok(())
            }
        }
    }
}

fn kitchen_or_current(
    session: &Session,
    kitchen: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    match kitchen {
        Some(id) => Ok(id.to_string()),
        None => session
            .current_kitchen_id()
            .ok_or_else(|| "No current kitchen".into()),
    }
}
