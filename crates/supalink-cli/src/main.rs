//! Supalink CLI - link app records to Supabase from the command line

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use supalink_core::auth::KeyringTokenStore;
use supalink_core::config::BootstrapConfig;
use supalink_core::deep_link::DeepLinkInbox;
use tracing_subscriber::EnvFilter;

use crate::cli::{AppsCommand, Cli, Commands};
use crate::commands::apps::{run_apps_add, run_apps_list, run_apps_remove};
use crate::commands::common::CliContext;
use crate::commands::connection::{run_connect_local, run_link, run_login, run_unlink};
use crate::commands::deep_link::run_deep_link;
use crate::commands::settings::run_test_mode;
use crate::commands::status::{run_projects, run_status};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BootstrapConfig::from_env().map_err(CliError::Config)?;
    let ctx = CliContext::new(cli.db_path, KeyringTokenStore::default(), config);

    match cli.command {
        Commands::Apps { command } => match command {
            AppsCommand::List { json } => run_apps_list(&ctx, json).await?,
            AppsCommand::Add { name } => {
                run_apps_add(&ctx, &name).await?;
            }
            AppsCommand::Remove { app } => run_apps_remove(&ctx, app).await?,
        },
        Commands::Status { app, json } => run_status(&ctx, app, json).await?,
        Commands::Projects { app, json } => run_projects(&ctx, app, json).await?,
        Commands::Link { app, project_id } => run_link(&ctx, app, &project_id).await?,
        Commands::Unlink { app } => run_unlink(&ctx, app).await?,
        Commands::ConnectLocal {
            app,
            url,
            anon_key,
        } => run_connect_local(&ctx, app, &url, &anon_key).await?,
        Commands::Login { app } => run_login(&ctx, app).await?,
        Commands::DeepLink { url } => {
            run_deep_link(&ctx, &url, Some(&DeepLinkInbox::default_location())).await?;
        }
        Commands::TestMode { state } => run_test_mode(&ctx, state).await?,
    }

    Ok(())
}
