//! Client configuration.
//!
//! One absolute base URL locates the notes API; the login endpoint defaults to
//! `{base}/login` and can be overridden. Values can come from code or from the
//! `NOTESYNC_*` environment variables.

use std::time::Duration;

use thiserror::Error;

use crate::notification::DEFAULT_NOTIFICATION_TIMEOUT;
use crate::session::SESSION_STORAGE_KEY;
use crate::util::{is_http_url, normalize_text_option};

pub const API_BASE_URL_ENV: &str = "NOTESYNC_API_BASE_URL";
pub const LOGIN_URL_ENV: &str = "NOTESYNC_LOGIN_URL";
pub const NOTIFICATION_TIMEOUT_ENV: &str = "NOTESYNC_NOTIFICATION_TIMEOUT_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must include http:// or https:// (got '{value}')")]
    InvalidUrl { field: &'static str, value: String },
    #[error("{field} must be a whole number of milliseconds (got '{value}')")]
    InvalidTimeout { field: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
    login_url: String,
    notification_timeout: Duration,
    session_key: String,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> ConfigResult<Self> {
        let api_base_url = normalize_url(Some(api_base_url.into()), "api_base_url")?;
        let login_url = format!("{api_base_url}/login");
        Ok(Self {
            api_base_url,
            login_url,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            session_key: SESSION_STORAGE_KEY.to_string(),
        })
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let base = normalize_text_option(lookup(API_BASE_URL_ENV))
            .ok_or(ConfigError::Missing(API_BASE_URL_ENV))?;
        let mut config = Self::new(base)?;

        if let Some(login_url) = normalize_text_option(lookup(LOGIN_URL_ENV)) {
            config = config.with_login_url(login_url)?;
        }
        if let Some(raw) = normalize_text_option(lookup(NOTIFICATION_TIMEOUT_ENV)) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                field: NOTIFICATION_TIMEOUT_ENV,
                value: raw.clone(),
            })?;
            config = config.with_notification_timeout(Duration::from_millis(millis));
        }
        Ok(config)
    }

    pub fn with_login_url(mut self, login_url: impl Into<String>) -> ConfigResult<Self> {
        self.login_url = normalize_url(Some(login_url.into()), "login_url")?;
        Ok(self)
    }

    #[must_use]
    pub const fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> ConfigResult<Self> {
        self.session_key =
            normalize_text_option(Some(key.into())).ok_or(ConfigError::Missing("session_key"))?;
        Ok(self)
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.api_base_url)
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub const fn notification_timeout(&self) -> Duration {
        self.notification_timeout
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }
}

fn normalize_url(raw: Option<String>, field: &'static str) -> ConfigResult<String> {
    let value = normalize_text_option(raw).ok_or(ConfigError::Missing(field))?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidUrl { field, value })
    }
}
