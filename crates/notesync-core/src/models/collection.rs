//! Immutable ordered note collection.

use std::collections::HashSet;
use std::sync::Arc;

use super::{Note, NoteId};

/// Ordered, id-unique sequence of notes.
///
/// Values are never modified in place: each reconciliation step returns a new
/// collection and leaves every previously handed-out value as it was. Cloning
/// is cheap and shares the underlying storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Arc<[Note]>,
}

impl Default for NoteCollection {
    fn default() -> Self {
        Self {
            notes: Arc::from(Vec::new()),
        }
    }
}

impl From<Vec<Note>> for NoteCollection {
    /// Keeps server order. If the server repeats an id, the first occurrence wins.
    fn from(notes: Vec<Note>) -> Self {
        let mut seen = HashSet::with_capacity(notes.len());
        let unique = notes
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect::<Vec<_>>();
        Self {
            notes: Arc::from(unique),
        }
    }
}

impl FromIterator<Note> for NoteCollection {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

impl NoteCollection {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.get(id).is_some()
    }

    /// True when both values share the same underlying storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.notes, &other.notes)
    }

    /// New collection with `note` at the end.
    ///
    /// An id that is already present is replaced in place instead, keeping
    /// the collection unique by id.
    #[must_use]
    pub fn append(&self, note: Note) -> Self {
        if self.contains(&note.id) {
            let id = note.id.clone();
            return self.replace_by_id(&id, note);
        }

        let mut notes = Vec::with_capacity(self.notes.len() + 1);
        notes.extend(self.notes.iter().cloned());
        notes.push(note);
        Self {
            notes: Arc::from(notes),
        }
    }

    /// New collection where the entry with `id` is `note`, at the same index.
    ///
    /// Missing ids leave the contents unchanged.
    #[must_use]
    pub fn replace_by_id(&self, id: &NoteId, note: Note) -> Self {
        let notes = self
            .notes
            .iter()
            .map(|existing| {
                if &existing.id == id {
                    note.clone()
                } else {
                    existing.clone()
                }
            })
            .collect::<Vec<_>>();
        Self {
            notes: Arc::from(notes),
        }
    }

    /// New collection without the entry with `id`. Missing ids are a no-op.
    #[must_use]
    pub fn remove_by_id(&self, id: &NoteId) -> Self {
        let notes = self
            .notes
            .iter()
            .filter(|note| &note.id != id)
            .cloned()
            .collect::<Vec<_>>();
        Self {
            notes: Arc::from(notes),
        }
    }

    /// New collection holding only the important notes, in relative order.
    #[must_use]
    pub fn important_only(&self) -> Self {
        let notes = self
            .notes
            .iter()
            .filter(|note| note.important)
            .cloned()
            .collect::<Vec<_>>();
        Self {
            notes: Arc::from(notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn note(id: i64, content: &str, important: bool) -> Note {
        Note {
            id: NoteId::Number(id),
            content: content.to_string(),
            important,
        }
    }

    fn sample() -> NoteCollection {
        NoteCollection::from(vec![note(1, "a", false), note(2, "b", true)])
    }

    #[test]
    fn from_server_keeps_order() {
        let collection =
            NoteCollection::from(vec![note(3, "c", false), note(1, "a", true), note(2, "b", false)]);
        let ids = collection.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![NoteId::Number(3), NoteId::Number(1), NoteId::Number(2)]
        );
    }

    #[test]
    fn from_server_drops_repeated_ids() {
        let collection = NoteCollection::from(vec![note(1, "first", false), note(1, "dup", true)]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.as_slice()[0].content, "first");
    }

    #[test]
    fn append_adds_to_end_without_touching_original() {
        let original = sample();
        let appended = original.append(note(3, "x", true));

        assert_eq!(original.len(), 2);
        assert_eq!(appended.len(), 3);
        assert_eq!(appended.as_slice()[2], note(3, "x", true));
        assert!(!original.ptr_eq(&appended));
    }

    #[test]
    fn append_with_existing_id_replaces_in_place() {
        let appended = sample().append(note(1, "a2", true));
        assert_eq!(
            appended.as_slice(),
            &[note(1, "a2", true), note(2, "b", true)]
        );
    }

    #[test]
    fn replace_by_id_preserves_position() {
        let original = sample();
        let replaced = original.replace_by_id(&NoteId::Number(1), note(1, "a", true));

        assert_eq!(
            replaced.as_slice(),
            &[note(1, "a", true), note(2, "b", true)]
        );
        assert_eq!(original.as_slice()[0], note(1, "a", false));
    }

    #[test]
    fn replace_missing_id_keeps_contents() {
        let original = sample();
        let replaced = original.replace_by_id(&NoteId::Number(9), note(9, "z", true));
        assert_eq!(replaced, original);
    }

    #[test]
    fn remove_by_id_drops_exactly_one_entry() {
        let original = sample();
        let removed = original.remove_by_id(&NoteId::Number(2));

        assert_eq!(removed.as_slice(), &[note(1, "a", false)]);
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let original = sample();
        assert_eq!(original.remove_by_id(&NoteId::Number(5)), original);
    }

    #[test]
    fn important_only_keeps_relative_order() {
        let collection = NoteCollection::from(vec![
            note(1, "a", true),
            note(2, "b", false),
            note(3, "c", true),
        ]);
        assert_eq!(
            collection.important_only().as_slice(),
            &[note(1, "a", true), note(3, "c", true)]
        );
    }

    #[test]
    fn clones_share_storage() {
        let original = sample();
        let clone = original.clone();
        assert!(original.ptr_eq(&clone));
    }
}
