use crate::commands::common::{open_signed_in_app, resolve_note_id};
use crate::error::CliError;

pub async fn run_delete(id: &str, api_base: Option<String>) -> Result<(), CliError> {
    let mut app = open_signed_in_app(api_base).await?;
    let note_id = resolve_note_id(app.notes().notes(), id)?;

    if !app.delete(&note_id).await {
        return Err(CliError::Request(format!("Failed to delete note {note_id}")));
    }

    println!("Deleted {note_id}");
    Ok(())
}
