//! Sync controller: owns the note collection, the live session and the
//! notification, and reconciles repository responses into them.
//!
//! Every method takes `&self`, so several requests may be in flight at once.
//! State is only touched between await points and responses are applied in
//! completion order against whatever collection is current at that moment.
//! Replacing or removing an id that is no longer present is a no-op.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::auth::{Authenticator, Credentials};
use crate::error::{Error, Result};
use crate::models::{Note, NoteCollection, NoteDraft, NoteId, Session};
use crate::notification::NotificationCenter;
use crate::repository::NoteRepository;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;

pub const WRONG_CREDENTIALS_MESSAGE: &str = "Wrong credentials";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load notes from server";

/// Result of a successful [`SyncController::toggle_importance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server accepted the change; holds the note it returned.
    Updated(Note),
    /// The update failed and the note was dropped locally; holds the note as
    /// it was before the attempt.
    Removed(Note),
}

#[derive(Debug, Default)]
struct ControllerState {
    notes: Option<NoteCollection>,
    session: Option<Session>,
}

pub struct SyncController<R, A, S> {
    repository: R,
    authenticator: A,
    sessions: SessionStore<S>,
    notifications: NotificationCenter,
    state: Mutex<ControllerState>,
}

impl<R, A, S> SyncController<R, A, S>
where
    R: NoteRepository,
    A: Authenticator,
    S: KeyValueStorage,
{
    pub fn new(
        repository: R,
        authenticator: A,
        sessions: SessionStore<S>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            repository,
            authenticator,
            sessions,
            notifications,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Startup: restore any persisted session, then load the collection.
    pub async fn initialize(&self) -> Result<NoteCollection> {
        self.restore_session();
        self.load_notes().await
    }

    pub fn restore_session(&self) -> Option<Session> {
        let session = self.sessions.load()?;
        self.repository.set_token(&session.token);
        tracing::info!(username = %session.username, "Restored persisted session");
        self.state().session = Some(session.clone());
        Some(session)
    }

    pub async fn load_notes(&self) -> Result<NoteCollection> {
        match self.repository.fetch_all().await {
            Ok(notes) => {
                let collection = NoteCollection::from(notes);
                tracing::info!(count = collection.len(), "Loaded notes");
                self.state().notes = Some(collection.clone());
                Ok(collection)
            }
            Err(error) => {
                tracing::warn!("Failed to fetch notes: {}", error);
                self.notifications.show(LOAD_FAILED_MESSAGE);
                Err(error.into())
            }
        }
    }

    /// Sign in. Any failure leaves the current session as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let credentials = Credentials::new(username, password);
        let session = match self.authenticator.login(&credentials).await {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(username, "Login failed: {}", error);
                self.notifications.show(WRONG_CREDENTIALS_MESSAGE);
                return Err(error.into());
            }
        };

        self.state().session = Some(session.clone());
        let saved = self.sessions.save(&session);
        self.repository.set_token(&session.token);
        tracing::info!(username = %session.username, "Signed in");

        if let Err(error) = saved {
            tracing::warn!("Signed in but failed to persist session: {}", error);
            return Err(error.into());
        }
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        let previous = self.state().session.take();
        self.repository.clear_token();
        self.sessions.clear()?;
        if let Some(session) = previous {
            tracing::info!(username = %session.username, "Signed out");
        }
        Ok(())
    }

    pub async fn add_note(&self, draft: NoteDraft) -> Result<Note> {
        self.loaded_notes()?;

        match self.repository.create(&draft).await {
            Ok(note) => {
                self.reconcile(|notes| notes.append(note.clone()));
                Ok(note)
            }
            Err(error) => {
                tracing::warn!("Failed to create note: {}", error);
                self.notifications
                    .show(format!("Failed to save note '{}'", draft.content));
                Err(error.into())
            }
        }
    }

    /// Flip the importance of the note with `id`.
    ///
    /// Any update failure is taken to mean the note is gone from the server:
    /// the user is told so and the note is dropped from the collection.
    pub async fn toggle_importance(&self, id: &NoteId) -> Result<ToggleOutcome> {
        let original = self
            .loaded_notes()?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NoteNotFound(id.clone()))?;
        let candidate = original.with_importance_toggled();

        match self.repository.update(id, &candidate).await {
            Ok(returned) => {
                self.reconcile(|notes| notes.replace_by_id(id, returned.clone()));
                Ok(ToggleOutcome::Updated(returned))
            }
            Err(error) => {
                tracing::warn!(note = %id, "Update failed, dropping note: {}", error);
                self.notifications.show(format!(
                    "Note '{}' was already removed from server",
                    original.content
                ));
                self.reconcile(|notes| notes.remove_by_id(id));
                Ok(ToggleOutcome::Removed(original))
            }
        }
    }

    pub fn visible_notes(&self, show_all: bool) -> Result<NoteCollection> {
        let notes = self.loaded_notes()?;
        if show_all {
            Ok(notes)
        } else {
            Ok(notes.important_only())
        }
    }

    pub fn notes(&self) -> Option<NoteCollection> {
        self.state().notes.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state().session.clone()
    }

    pub fn notification(&self) -> Option<String> {
        self.notifications.current()
    }

    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub const fn repository(&self) -> &R {
        &self.repository
    }

    pub const fn session_store(&self) -> &SessionStore<S> {
        &self.sessions
    }

    fn loaded_notes(&self) -> Result<NoteCollection> {
        self.state().notes.clone().ok_or(Error::NotesNotLoaded)
    }

    fn reconcile(&self, apply: impl FnOnce(&NoteCollection) -> NoteCollection) {
        let mut state = self.state();
        if let Some(notes) = state.notes.as_ref() {
            let next = apply(notes);
            state.notes = Some(next);
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
