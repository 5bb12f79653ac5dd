//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters shown for a title before it is elided.
pub const MAX_TITLE_PREVIEW: usize = 80;

/// Opaque identifier assigned by the remote todo API
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Remote-assigned identifier
    pub id: NoteId,
    /// Trimmed, non-empty title
    pub title: String,
    /// Completion flag
    pub done: bool,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, title: impl Into<String>, done: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            done,
        }
    }

    /// Title truncated to `max_chars` characters, with `...` appended when cut.
    #[must_use]
    pub fn title_preview(&self, max_chars: usize) -> String {
        if self.title.chars().count() <= max_chars {
            return self.title.clone();
        }
        let mut preview = self.title.chars().take(max_chars).collect::<String>();
        preview.push_str("...");
        preview
    }
}

/// Trim a candidate title, returning `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_display_is_raw_value() {
        let id = NoteId::new("65f1c0ffee");
        assert_eq!(id.to_string(), "65f1c0ffee");
        assert_eq!(id.as_str(), "65f1c0ffee");
    }

    #[test]
    fn test_note_id_serializes_transparently() {
        let note = Note::new("1", "Buy milk", false);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "1");
    }

    #[test]
    fn test_title_preview_keeps_short_titles() {
        let note = Note::new("1", "Buy milk", false);
        assert_eq!(note.title_preview(MAX_TITLE_PREVIEW), "Buy milk");
    }

    #[test]
    fn test_title_preview_elides_long_titles() {
        let note = Note::new("1", "a".repeat(100), false);
        let preview = note.title_preview(MAX_TITLE_PREVIEW);
        assert_eq!(preview.chars().count(), MAX_TITLE_PREVIEW + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_title_preview_counts_characters_not_bytes() {
        let note = Note::new("1", "äöü".repeat(3), false);
        assert_eq!(note.title_preview(9), "äöüäöüäöü");
        assert_eq!(note.title_preview(2), "äö...");
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Call mom "), Some("Call mom".to_string()));
        assert_eq!(normalize_title(" \t\n "), None);
        assert_eq!(normalize_title(""), None);
    }
}
