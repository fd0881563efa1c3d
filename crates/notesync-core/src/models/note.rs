//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned note identifier.
///
/// The notes API is free to issue numeric or textual ids; both are accepted
/// and serialized back in the form they arrived in. Clients never mint ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A note as stored on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned identifier
    pub id: NoteId,
    /// Plain text content
    pub content: String,
    /// Importance flag
    #[serde(default)]
    pub important: bool,
}

impl Note {
    /// Copy of this note with the importance flag inverted
    #[must_use]
    pub fn with_importance_toggled(&self) -> Self {
        Self {
            important: !self.important,
            ..self.clone()
        }
    }
}

/// A note that has not been saved yet, so it carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub content: String,
    pub important: bool,
}

impl NoteDraft {
    #[must_use]
    pub fn new(content: impl Into<String>, important: bool) -> Self {
        Self {
            content: content.into(),
            important,
        }
    }
}
