use serde::Serialize;
use tick_core::auth::{AuthApiClient, AuthBackend};
use tick_core::models::{ViewState, MAX_TITLE_PREVIEW};
use tick_core::store::KeyValueStore;
use tick_core::todos::{TodoApiClient, TodoBackend};
use tick_core::{ApiConfig, Note, NoteId, TodoApp};

use crate::cli_config::{resolve_api_config, CliConfig};
use crate::credentials::KeyringStore;
use crate::error::CliError;

pub type CliApp = TodoApp<AuthApiClient, KeyringStore, TodoApiClient>;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub position: usize,
    pub id: String,
    pub title: String,
    pub preview: String,
    pub done: bool,
}

pub fn load_api_config(api_base: Option<String>) -> Result<ApiConfig, CliError> {
    let file = CliConfig::load().map_err(CliError::Config)?;
    Ok(resolve_api_config(api_base, &file)?)
}

pub fn open_app(api_base: Option<String>) -> Result<CliApp, CliError> {
    let config = load_api_config(api_base)?;
    tracing::debug!("Using API base URL {}", config.base_url());
    Ok(TodoApp::connect(&config, KeyringStore::default())?)
}

/// Opens the app and resumes the stored session, hydrating its notes.
pub async fn open_signed_in_app(api_base: Option<String>) -> Result<CliApp, CliError> {
    let mut app = open_app(api_base)?;
    if !app.restore().await {
        return Err(CliError::NotSignedIn);
    }
    Ok(app)
}

/// `Signed in as ...` header line.
pub fn format_header<A: AuthBackend, K: KeyValueStore, B: TodoBackend>(
    app: &TodoApp<A, K, B>,
) -> String {
    let session = app.session();
    if !session.is_logged_in() {
        return "Not signed in".to_string();
    }
    let email = session.email();
    if email.is_empty() || email == session.user_name() {
        format!("Signed in as {}", session.user_name())
    } else {
        format!("Signed in as {} <{}>", session.user_name(), email)
    }
}

/// One-line description of a non-default filter/search, if any.
pub fn format_view_summary(view: &ViewState) -> Option<String> {
    if view.is_default() {
        return None;
    }
    let mut summary = format!("Showing: {}", view.filter.label());
    if !view.search_text.is_empty() {
        summary.push_str(&format!(" matching \"{}\"", view.search_text));
    }
    Some(summary)
}

/// Render `(collection index, note)` pairs as numbered lines.
///
/// Numbers are 1-based positions in the full collection of `total` notes.
pub fn format_note_lines(entries: &[(usize, &Note)], total: usize) -> Vec<String> {
    if total == 0 {
        return vec!["No notes yet. Add one with 'add <title>'.".to_string()];
    }
    if entries.is_empty() {
        return vec!["No notes match the current filter.".to_string()];
    }
    entries
        .iter()
        .map(|(index, note)| {
            let mark = if note.done { 'x' } else { ' ' };
            let short_id = note.id.as_str().chars().take(13).collect::<String>();
            format!(
                "{:>3}. [{mark}] {}  ({short_id})",
                index + 1,
                note.title_preview(MAX_TITLE_PREVIEW)
            )
        })
        .collect()
}

pub fn note_to_list_item(index: usize, note: &Note) -> NoteListItem {
    NoteListItem {
        position: index + 1,
        id: note.id.to_string(),
        title: note.title.clone(),
        preview: note.title_preview(MAX_TITLE_PREVIEW),
        done: note.done,
    }
}

/// Parse a 1-based position into a collection index.
pub fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(format!("'{}' is not a note number", raw.trim())),
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

/// Resolve an exact id or a unique id prefix against the loaded notes.
pub fn resolve_note_id(notes: &[Note], query: &str) -> Result<NoteId, CliError> {
    let query = normalize_note_identifier(query)?;
    if let Some(note) = notes.iter().find(|note| note.id.as_str() == query) {
        return Ok(note.id.clone());
    }

    let matching = notes
        .iter()
        .filter(|note| note.id.as_str().starts_with(&query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::NoteNotFound(query)),
        [note] => Ok(note.id.clone()),
        many => {
            let options = many
                .iter()
                .take(3)
                .map(|note| note.id.as_str().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn normalize_title_parts(parts: &[String]) -> Result<String, CliError> {
    tick_core::models::normalize_title(&parts.join(" ")).ok_or(CliError::EmptyTitle)
}
