//! Remote notes API.

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{Note, NoteDraft, NoteId};
use crate::util::parse_api_error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Notes API error: {message}")]
    Api { status: StatusCode, message: String },
}

impl RepositoryError {
    /// True when the server answered 404 for the addressed resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Stateless access to the notes endpoint.
///
/// Implementations forward failures unchanged; interpreting them is the
/// caller's job. The attached token applies to requests started after
/// [`NoteRepository::set_token`] returns.
pub trait NoteRepository: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = RepositoryResult<Vec<Note>>> + Send;

    fn create(&self, draft: &NoteDraft) -> impl Future<Output = RepositoryResult<Note>> + Send;

    fn update(
        &self,
        id: &NoteId,
        note: &Note,
    ) -> impl Future<Output = RepositoryResult<Note>> + Send;

    fn set_token(&self, token: &str);

    fn clear_token(&self);
}

/// [`NoteRepository`] backed by `reqwest`.
#[derive(Debug)]
pub struct HttpNoteRepository {
    notes_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpNoteRepository {
    pub fn new(config: &ClientConfig) -> RepositoryResult<Self> {
        Ok(Self::with_client(config, Client::builder().build()?))
    }

    pub fn with_client(config: &ClientConfig, client: Client) -> Self {
        Self {
            notes_url: config.notes_url(),
            client,
            token: RwLock::new(None),
        }
    }

    pub fn notes_url(&self) -> &str {
        &self.notes_url
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!(
            "{}/{}",
            self.notes_url,
            urlencoding::encode(&id.to_string())
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<T> {
        let response = self
            .authorized(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Api {
                status,
                message: parse_api_error(status, &body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

impl NoteRepository for HttpNoteRepository {
    async fn fetch_all(&self) -> RepositoryResult<Vec<Note>> {
        tracing::debug!(url = %self.notes_url, "GET notes");
        self.send_json(self.client.get(&self.notes_url)).await
    }

    async fn create(&self, draft: &NoteDraft) -> RepositoryResult<Note> {
        tracing::debug!(url = %self.notes_url, "POST note");
        self.send_json(self.client.post(&self.notes_url).json(draft))
            .await
    }

    async fn update(&self, id: &NoteId, note: &Note) -> RepositoryResult<Note> {
        let url = self.note_url(id);
        tracing::debug!(url = %url, "PUT note");
        self.send_json(self.client.put(&url).json(note)).await
    }

    fn set_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> HttpNoteRepository {
        HttpNoteRepository::new(&ClientConfig::new("http://localhost:3001/api").unwrap()).unwrap()
    }

    #[test]
    fn note_url_appends_encoded_id() {
        let repository = repository();
        assert_eq!(
            repository.note_url(&NoteId::Number(3)),
            "http://localhost:3001/api/notes/3"
        );
        assert_eq!(
            repository.note_url(&NoteId::from("a b")),
            "http://localhost:3001/api/notes/a%20b"
        );
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let repository = repository();
        assert!(!repository.has_token());
        repository.set_token("abc");
        assert!(repository.has_token());
        repository.clear_token();
        assert!(!repository.has_token());
    }

    #[test]
    fn is_not_found_matches_only_404() {
        let not_found = RepositoryError::Api {
            status: StatusCode::NOT_FOUND,
            message: "HTTP 404".to_string(),
        };
        let server_error = RepositoryError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "HTTP 500".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!server_error.is_not_found());
    }
}
