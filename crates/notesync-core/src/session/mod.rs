//! Session persistence on top of a [`KeyValueStorage`].

use crate::models::Session;
use crate::storage::{KeyValueStorage, StorageResult};

/// Storage key holding the JSON-serialized signed-in session.
pub const SESSION_STORAGE_KEY: &str = "loggedNoteAppUser";

/// Loads and saves the one durable session record.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSION_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Restore the persisted session.
    ///
    /// Absent, unreadable, and malformed records all read as no session.
    pub fn load(&self) -> Option<Session> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!("Failed to read persisted session: {}", error);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::warn!("Ignoring malformed persisted session: {}", error);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> StorageResult<()> {
        let serialized = serde_json::to_string(session)?;
        self.storage.set_item(&self.key, &serialized)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove_item(&self.key)
    }
}
