use notesync_core::{NoteDraft, ToggleOutcome};

use crate::app::CliController;
use crate::commands::common::{
    format_note_lines, importance_label, normalize_content, normalize_note_identifier,
    resolve_note,
};
use crate::error::CliError;

pub async fn run_list(
    controller: &CliController,
    important_only: bool,
    as_json: bool,
) -> Result<(), CliError> {
    controller.initialize().await?;
    let notes = controller.visible_notes(!important_only)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(notes.as_slice())?);
    } else if notes.is_empty() {
        println!("No notes found");
    } else {
        for line in format_note_lines(&notes) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_add(
    controller: &CliController,
    content_parts: &[String],
    important: bool,
) -> Result<(), CliError> {
    let content = normalize_content(&content_parts.join(" ")).ok_or(CliError::EmptyContent)?;

    controller.initialize().await?;
    let note = controller
        .add_note(NoteDraft::new(content, important))
        .await?;

    println!("Created note {} ({})", note.id, importance_label(&note));
    Ok(())
}

pub async fn run_toggle(controller: &CliController, id: &str) -> Result<(), CliError> {
    let query = normalize_note_identifier(id)?;

    let notes = controller.initialize().await?;
    let note_id = resolve_note(&notes, &query)?.id.clone();

    match controller.toggle_importance(&note_id).await? {
        ToggleOutcome::Updated(note) => {
            println!("Note {} is now {}", note.id, importance_label(&note));
        }
        ToggleOutcome::Removed(note) => {
            println!("Removed note {} from the local list", note.id);
        }
    }

    Ok(())
}
