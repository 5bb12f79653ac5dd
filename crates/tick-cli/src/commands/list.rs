use tick_core::StatusFilter;

use crate::commands::common::{
    format_header, format_note_lines, format_view_summary, note_to_list_item,
    open_signed_in_app, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    filter: StatusFilter,
    search: Option<&str>,
    as_json: bool,
    api_base: Option<String>,
) -> Result<(), CliError> {
    let mut app = open_signed_in_app(api_base).await?;
    let notes = app.notes_mut();
    notes.set_filter(filter);
    if let Some(search) = search {
        notes.set_search(search);
    }
    let entries = app.notes().visible_entries();

    if as_json {
        let json_items = entries
            .iter()
            .map(|(index, note)| note_to_list_item(*index, note))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        println!("{}", format_header(&app));
        if let Some(summary) = format_view_summary(app.notes().view()) {
            println!("{summary}");
        }
        for line in format_note_lines(&entries, app.notes().len()) {
            println!("{line}");
        }
    }

    Ok(())
}
