//! notesync-core - Core library for notesync
//!
//! Keeps a local note collection synchronized with a remote notes API,
//! persists the signed-in session in client storage, and surfaces transient
//! notifications. Presentation layers (the CLI) drive a [`SyncController`]
//! and render the state it exposes.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod notification;
pub mod repository;
pub mod session;
pub mod storage;
pub mod util;

pub use config::ClientConfig;
pub use controller::{SyncController, ToggleOutcome};
pub use error::{Error, Result};
pub use models::{Note, NoteCollection, NoteDraft, NoteId, Session};
