//! notesync CLI - keep a local view of a remote notes service in step
//!
//! Each invocation restores the profile's stored session, talks to the notes
//! API once and prints the resulting state.

mod app;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod keyring_storage;

use std::env;

use clap::Parser;
use notesync_core::session::SessionStore;

use crate::app::{build_controller, finish, resolve_client_config, CliStorage};
use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::{run_login, run_logout, run_status};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::notes::{run_add, run_list, run_toggle};
use crate::config_profiles::{storage_path_override, CliProfilesConfig};
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
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notesync=info".parse().expect("valid directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global_profile = cli.profile.as_deref();

    match cli.command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => run_config(command, global_profile),
        Commands::Status => {
            let (profile_name, sessions) = open_session_store(global_profile)?;
            run_status(&sessions, &profile_name);
            Ok(())
        }
        command => run_remote(command, global_profile).await,
    }
}

/// Commands that talk to the notes API through a sync controller.
async fn run_remote(command: Commands, global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let client = resolve_client_config(&profile_name, config.profile(&profile_name), |name| {
        env::var(name).ok()
    })?;
    let storage = CliStorage::for_profile(&profile_name, storage_path_override());
    let controller = build_controller(&client, storage)?;

    let result = match command {
        Commands::List { important, json } => run_list(&controller, important, json).await,
        Commands::Add { content, important } => run_add(&controller, &content, important).await,
        Commands::Toggle { id } => run_toggle(&controller, &id).await,
        Commands::Login { username, password } => {
            run_login(&controller, &profile_name, &username, &password).await
        }
        Commands::Logout => run_logout(&controller, &profile_name),
        Commands::Status
        | Commands::Config { .. }
        | Commands::Completions { .. } => Ok(()),
    };

    finish(&controller, result)
}

fn open_session_store(
    global_profile: Option<&str>,
) -> Result<(String, SessionStore<CliStorage>), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let storage = CliStorage::for_profile(&profile_name, storage_path_override());
    Ok((profile_name, SessionStore::new(storage)))
}
