//! Gogn Membership CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! gogn-cli migrate
//!
//! # Create an admin user (prints the generated access key once)
//! gogn-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//!
//! # Seed local development data
//! gogn-cli seed
//!
//! # Run the member code assignor from the shell
//! gogn-cli assign-codes
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run admin database migrations
//! - `admin create` - Create admin users
//! - `seed` - Seed database with development data
//! - `assign-codes` - Derive and persist member codes

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gogn-cli")]
#[command(author, version, about = "Gogn Membership CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with development data
    Seed,
    /// Derive and persist member codes for all plans
    AssignCodes,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, name, role } => {
                commands::admin::create_user(&email, &name, &role).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
        Commands::AssignCodes => commands::assign_codes::run().await?,
    }
    Ok(())
}
