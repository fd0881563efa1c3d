use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notesync_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found for id: {0}")]
    NoteNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    /// A core operation failed and already produced a user-facing message.
    #[error("{0}")]
    Notified(String),
    #[error(
        "Profile '{0}' has no notes API configured. Run `notesync config init --api-base-url <URL>` or set NOTESYNC_API_BASE_URL."
    )]
    NotConfigured(String),
}
