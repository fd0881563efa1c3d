//! Error types for notesync-core

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::models::NoteId;
use crate::repository::RepositoryError;
use crate::storage::StorageError;

/// Result type alias using notesync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notesync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote notes API error
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Login rejected or login request failed
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Durable client storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An operation needed the note collection before the initial fetch finished
    #[error("Notes have not been loaded yet")]
    NotesNotLoaded,

    /// Note not found in the local collection
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
}
