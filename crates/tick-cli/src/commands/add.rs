use crate::commands::common::{normalize_title_parts, open_signed_in_app};
use crate::error::CliError;

pub async fn run_add(title_parts: &[String], api_base: Option<String>) -> Result<(), CliError> {
    let title = normalize_title_parts(title_parts)?;
    let mut app = open_signed_in_app(api_base).await?;

    if !app.create_or_update(&title).await {
        return Err(CliError::Request("Failed to create note".to_string()));
    }

    if let Some(note) = app.notes().notes().last() {
        println!("{}", note.id);
    }
    Ok(())
}
