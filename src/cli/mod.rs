// CLI module for administrative operations run next to the server

pub mod create_user;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::types::internal::Role;

/// EduTrack backend
#[derive(Parser, Debug)]
#[command(name = "edutrack-backend")]
#[command(about = "EduTrack pedagogical tracking backend", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an account
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// teacher, inspector, founder, admin or sg
        #[arg(long, value_parser = parse_role)]
        role: Role,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        hourly_rate: Option<f64>,
    },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse::<Role>().map_err(|e| e.to_string())
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

/// Execute a one-shot CLI command
///
/// `Serve` and `Migrate` are handled by main; this covers the commands
/// that need the full application data.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::CreateUser {
            username,
            password,
            role,
            first_name,
            last_name,
            email,
            hourly_rate,
        } => {
            let created = create_user::create_user(
                &app_data.credential_store,
                crate::stores::NewUser {
                    username,
                    password,
                    role,
                    first_name,
                    last_name,
                    email,
                    hourly_rate,
                },
            )
            .await?;
            println!("Created {} account '{}' ({})", created.role, created.username, created.id);
        }
        Commands::Serve | Commands::Migrate => {}
    }
    Ok(())
}
