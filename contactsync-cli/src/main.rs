//! contactsync CLI - HTTP bridge for CRM contacts
//!
//! Entry point for:
//! - `serve`: run the contacts API over the primary and secondary stores
//! - `check`: verify both stores are reachable with the current configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "contactsync",
    author,
    version,
    about = "HTTP bridge for CRM contacts with dual writes to a primary and a secondary store"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the contacts HTTP API
    Serve(commands::serve::ServeArgs),

    /// Ping the primary and secondary stores
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Existing environment variables win over .env entries. Loaded before
    // tracing so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match dotenv {
        Ok(path) => debug!("Loaded .env from {}", path.display()),
        Err(_) => debug!("No .env file found, using environment variables only"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Check(args) => commands::run_check(args).await?,
    }
    Ok(())
}
