//! Credential exchange with the login endpoint.

use std::fmt;
use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::Session;
use crate::util::parse_api_error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Login rejected: {message}")]
    Rejected { status: StatusCode, message: String },
}

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> AuthResult<()> {
        if self.username.trim().is_empty() {
            return Err(AuthError::InvalidInput("Username is required"));
        }
        if self.password.is_empty() {
            return Err(AuthError::InvalidInput("Password is required"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Exchanges credentials for a [`Session`].
pub trait Authenticator: Send + Sync {
    fn login(&self, credentials: &Credentials) -> impl Future<Output = AuthResult<Session>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    login_url: String,
    client: Client,
}

impl HttpAuthenticator {
    pub fn new(config: &ClientConfig) -> AuthResult<Self> {
        Ok(Self::with_client(config, Client::builder().build()?))
    }

    pub fn with_client(config: &ClientConfig, client: Client) -> Self {
        Self {
            login_url: config.login_url().to_string(),
            client,
        }
    }
}

impl Authenticator for HttpAuthenticator {
    async fn login(&self, credentials: &Credentials) -> AuthResult<Session> {
        credentials.validate()?;

        let response = self
            .client
            .post(&self.login_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status,
                message: parse_api_error(status, &body),
            });
        }

        Ok(response.json::<Session>().await?)
    }
}
