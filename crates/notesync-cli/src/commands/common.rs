use notesync_core::{Note, NoteCollection};

use crate::error::CliError;

const PREVIEW_CHARS: usize = 60;

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find the note whose displayed id equals `query`.
pub fn resolve_note<'a>(notes: &'a NoteCollection, query: &str) -> Result<&'a Note, CliError> {
    notes
        .iter()
        .find(|note| note.id.to_string() == query)
        .ok_or_else(|| CliError::NoteNotFound(query.to_string()))
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.content.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub const fn importance_marker(note: &Note) -> &'static str {
    if note.important {
        "*"
    } else {
        " "
    }
}

pub fn format_note_lines(notes: &NoteCollection) -> Vec<String> {
    let id_width = notes
        .iter()
        .map(|note| note.id.to_string().chars().count())
        .max()
        .unwrap_or(0);

    notes
        .iter()
        .map(|note| {
            let id = note.id.to_string();
            let marker = importance_marker(note);
            let preview = note_preview(note, PREVIEW_CHARS);
            format!("{id:<id_width$}  [{marker}] {preview}")
        })
        .collect()
}

pub const fn importance_label(note: &Note) -> &'static str {
    if note.important {
        "important"
    } else {
        "not important"
    }
}
