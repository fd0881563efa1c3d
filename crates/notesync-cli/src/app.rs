use std::path::PathBuf;
use std::time::Duration;

use notesync_core::auth::HttpAuthenticator;
use notesync_core::config::{
    ConfigError, API_BASE_URL_ENV, LOGIN_URL_ENV, NOTIFICATION_TIMEOUT_ENV,
};
use notesync_core::notification::NotificationCenter;
use notesync_core::repository::HttpNoteRepository;
use notesync_core::session::SessionStore;
use notesync_core::storage::{FileStorage, KeyValueStorage, StorageResult};
use notesync_core::{ClientConfig, SyncController};

use crate::config_profiles::{normalize_text_option, CliProfile};
use crate::error::CliError;
use crate::keyring_storage::KeyringStorage;

pub type CliController = SyncController<HttpNoteRepository, HttpAuthenticator, CliStorage>;

/// Where the CLI keeps the signed-in session for a profile.
#[derive(Debug)]
pub enum CliStorage {
    Keyring(KeyringStorage),
    /// Explicit opt-in through `NOTESYNC_STORAGE_PATH`.
    File(FileStorage),
}

impl CliStorage {
    pub fn for_profile(profile_name: &str, path_override: Option<PathBuf>) -> Self {
        match path_override {
            Some(path) => Self::File(FileStorage::new(path)),
            None => Self::Keyring(KeyringStorage::new(profile_name)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Keyring(storage) => format!(
                "OS keyring (service '{}', account '{}')",
                storage.service_name(),
                storage.account(notesync_core::session::SESSION_STORAGE_KEY)
            ),
            Self::File(storage) => format!("file {}", storage.path().display()),
        }
    }
}

impl KeyValueStorage for CliStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match self {
            Self::Keyring(storage) => storage.get_item(key),
            Self::File(storage) => storage.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        match self {
            Self::Keyring(storage) => storage.set_item(key, value),
            Self::File(storage) => storage.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        match self {
            Self::Keyring(storage) => storage.remove_item(key),
            Self::File(storage) => storage.remove_item(key),
        }
    }
}

/// Merge environment overrides over the stored profile.
pub fn resolve_client_config(
    profile_name: &str,
    profile: Option<&CliProfile>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, CliError> {
    let api_base_url = normalize_text_option(lookup(API_BASE_URL_ENV))
        .or_else(|| profile.and_then(CliProfile::api_base_url))
        .ok_or_else(|| CliError::NotConfigured(profile_name.to_string()))?;
    let mut config = ClientConfig::new(api_base_url).map_err(notesync_core::Error::from)?;

    if let Some(login_url) = normalize_text_option(lookup(LOGIN_URL_ENV))
        .or_else(|| profile.and_then(CliProfile::login_url))
    {
        config = config
            .with_login_url(login_url)
            .map_err(notesync_core::Error::from)?;
    }

    let timeout_ms = match normalize_text_option(lookup(NOTIFICATION_TIMEOUT_ENV)) {
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
            notesync_core::Error::from(ConfigError::InvalidTimeout {
                field: NOTIFICATION_TIMEOUT_ENV,
                value: raw.clone(),
            })
        })?),
        None => profile.and_then(|profile| profile.notification_timeout_ms),
    };
    if let Some(timeout_ms) = timeout_ms {
        config = config.with_notification_timeout(Duration::from_millis(timeout_ms));
    }

    Ok(config)
}

pub fn build_controller(
    config: &ClientConfig,
    storage: CliStorage,
) -> Result<CliController, CliError> {
    let repository = HttpNoteRepository::new(config).map_err(notesync_core::Error::from)?;
    let authenticator = HttpAuthenticator::new(config).map_err(notesync_core::Error::from)?;
    tracing::debug!(
        api_base_url = config.api_base_url(),
        storage = %storage.describe(),
        "Built sync controller"
    );
    let sessions = SessionStore::with_key(storage, config.session_key());
    let notifications = NotificationCenter::new(config.notification_timeout());

    Ok(SyncController::new(
        repository,
        authenticator,
        sessions,
        notifications,
    ))
}

/// Turn a core failure into the message the user was already shown.
pub fn surface(controller: &CliController, error: notesync_core::Error) -> CliError {
    match controller.notification() {
        Some(message) => {
            tracing::debug!("{}", error);
            CliError::Notified(message)
        }
        None => CliError::Core(error),
    }
}

/// Print any notification left by a successful command; surface it for a failed one.
pub fn finish(controller: &CliController, result: Result<(), CliError>) -> Result<(), CliError> {
    match result {
        Ok(()) => {
            if let Some(message) = controller.notification() {
                eprintln!("{message}");
            }
            Ok(())
        }
        Err(CliError::Core(error)) => Err(surface(controller, error)),
        Err(error) => Err(error),
    }
}
