use clap::{Args, Subcommand};
use serde::Serialize;

use kitchenbook_core::{Session, UserInfo};

use super::OutputFormat;
use crate::prompt::ArgsIdentity;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Sign in; without a name the last signed-in user is restored
    SignIn {
        /// Nickname
        #[arg(long, short)]
        name: Option<String>,

        /// Stable identity token
        #[arg(long)]
        openid: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar_url: Option<String>,
    },

    /// Show the signed-in user
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserView<'a> {
    user: Option<&'a UserInfo>,
    is_admin: bool,
    current_kitchen: Option<&'a str>,
}

impl UserCommand {
    pub fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::SignIn {
                name,
                openid,
                avatar_url,
            } => {
                let provider = ArgsIdentity {
                    nick_name: name.clone(),
                    openid: openid.clone(),
                    avatar_url: avatar_url.clone(),
                };
                match session.sign_in(&provider)? {
                    Some(user) => println!("Signed in as {}", user),
                    None => println!("Not signed in. Pass --name to sign in."),
                }
                Ok(())
            }

            UserSubcommand::Show { format } => {
                let view = UserView {
                    user: session.user(),
                    is_admin: session.is_admin(),
                    current_kitchen: session.current_kitchen().map(|k| k.name.as_str()),
                };
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    }
                    OutputFormat::Text => {
                        match view.user {
                            Some(user) => println!("User: {}", user),
                            None => println!("User: (not signed in)"),
                        }
                        if let Some(kitchen) = view.current_kitchen {
                            println!("Kitchen: {}", kitchen);
                        }
                        println!(
                            "Admin: {} (matched by {})",
                            if view.is_admin { "yes" } else { "no" },
                            session.admin_match()
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
