use std::env;

use notesync_core::config::{API_BASE_URL_ENV, LOGIN_URL_ENV};

use crate::app::{resolve_client_config, CliStorage};
use crate::cli::ConfigCommands;
use crate::config_profiles::{
    default_config_path, is_http_url, normalize_text_option, storage_path_override, CliProfile,
    CliProfilesConfig,
};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            login_url,
            notification_timeout_ms,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_base_url,
            login_url,
            notification_timeout_ms,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    login_url: Option<String>,
    notification_timeout_ms: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = merge_profile(
        config.profile(&profile_name).cloned().unwrap_or_default(),
        normalize_text_option(api_base_url)
            .or_else(|| normalize_text_option(env::var(API_BASE_URL_ENV).ok())),
        normalize_text_option(login_url)
            .or_else(|| normalize_text_option(env::var(LOGIN_URL_ENV).ok())),
        notification_timeout_ms,
    )?;

    *config.profile_mut_or_default(&profile_name) = profile;
    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved profile '{profile_name}' to {}", path.display());
    if no_activate {
        println!("Active profile unchanged.");
    } else {
        println!("Active profile: {profile_name}");
    }
    Ok(())
}

/// Layer explicit values over an existing profile and validate the result.
pub fn merge_profile(
    existing: CliProfile,
    api_base_url: Option<String>,
    login_url: Option<String>,
    notification_timeout_ms: Option<u64>,
) -> Result<CliProfile, CliError> {
    let api_base_url = api_base_url.or_else(|| existing.api_base_url()).ok_or_else(|| {
        CliError::Config(
            "Missing API base URL. Pass --api-base-url or set NOTESYNC_API_BASE_URL.".to_string(),
        )
    })?;
    let api_base_url = normalize_endpoint_url("api base URL", &api_base_url)?;

    let login_url = login_url
        .or_else(|| existing.login_url())
        .map(|url| normalize_endpoint_url("login URL", &url))
        .transpose()?;

    Ok(CliProfile {
        api_base_url: Some(api_base_url),
        login_url,
        notification_timeout_ms: notification_timeout_ms.or(existing.notification_timeout_ms),
    })
}

pub fn normalize_endpoint_url(label: &str, value: &str) -> Result<String, CliError> {
    let trimmed = value.trim().trim_end_matches('/');
    if is_http_url(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(CliError::Config(format!(
            "Invalid {label} '{value}'. Expected an http:// or https:// URL."
        )))
    }
}

fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let config_path = default_config_path().map_err(CliError::Config)?;

    println!("Profile:       {profile_name}");
    println!("Config file:   {}", config_path.display());

    match resolve_client_config(&profile_name, config.profile(&profile_name), |name| {
        env::var(name).ok()
    }) {
        Ok(client) => {
            println!("API base URL:  {}", client.api_base_url());
            println!("Notes URL:     {}", client.notes_url());
            println!("Login URL:     {}", client.login_url());
            println!(
                "Notification:  {} ms",
                client.notification_timeout().as_millis()
            );
        }
        Err(CliError::NotConfigured(_)) => {
            println!("API base URL:  (not configured)");
        }
        Err(error) => return Err(error),
    }

    let storage = CliStorage::for_profile(&profile_name, storage_path_override());
    println!("Session store: {}", storage.describe());
    Ok(())
}
