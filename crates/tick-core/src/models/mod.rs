//! Data models for tick

mod filter;
mod note;

pub use filter::{StatusFilter, ViewState};
pub use note::{normalize_title, Note, NoteId, MAX_TITLE_PREVIEW};
