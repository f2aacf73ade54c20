//! Farmácia HBR CLI - database setup and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the application and session tables, then seed the catalog
//! hbr-cli db init
//!
//! # Seed the six demo products if the catalog is empty
//! hbr-cli db seed
//!
//! # Print the catalog
//! hbr-cli products list
//! ```
//!
//! The database URL is read from `PHARMACY_DATABASE_URL` (or `DATABASE_URL`),
//! with `.env` support.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hbr-cli")]
#[command(author, version, about = "Farmácia HBR CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database setup
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Create application and session tables, then seed the catalog
    Init,
    /// Insert the demo products if the catalog is empty
    Seed,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Print every product with its price
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Db { action } => match action {
            DbAction::Init => commands::db::init().await?,
            DbAction::Seed => commands::db::seed().await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
        },
    }
    Ok(())
}
