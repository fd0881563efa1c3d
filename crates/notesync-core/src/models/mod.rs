//! Data models for notesync

mod collection;
mod note;
mod session;

pub use collection::NoteCollection;
pub use note::{Note, NoteDraft, NoteId};
pub use session::Session;
