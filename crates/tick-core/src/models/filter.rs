//! Status filter and view state for the note list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Note;
use crate::util::contains_ignore_case;

/// Which notes pass the status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Incomplete notes only
    Todo,
    /// Completed notes only
    Done,
}

impl StatusFilter {
    #[must_use]
    pub const fn matches(self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Todo => !note.done,
            Self::Done => note.done,
        }
    }

    /// Human label used by list headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Todo => "Incomplete",
            Self::Done => "Complete",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::All => "all",
            Self::Todo => "todo",
            Self::Done => "done",
        };
        f.write_str(value)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "todo" => Ok(Self::Todo),
            "done" => Ok(Self::Done),
            other => Err(format!(
                "unknown filter '{other}' (expected all, todo or done)"
            )),
        }
    }
}

/// Transient filter + search state for the note list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: StatusFilter,
    pub search_text: String,
}

impl ViewState {
    /// Status match AND case-insensitive title substring match.
    #[must_use]
    pub fn matches(&self, note: &Note) -> bool {
        self.filter.matches(note) && contains_ignore_case(&note.title, &self.search_text)
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.filter == StatusFilter::All && self.search_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("TODO".parse::<StatusFilter>().unwrap(), StatusFilter::Todo);
        assert_eq!(" done ".parse::<StatusFilter>().unwrap(), StatusFilter::Done);
        assert!("later".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn filter_display_roundtrips() {
        for filter in [StatusFilter::All, StatusFilter::Todo, StatusFilter::Done] {
            assert_eq!(filter.to_string().parse::<StatusFilter>().unwrap(), filter);
        }
    }

    #[test]
    fn filter_matches_by_done_flag() {
        let open = Note::new("1", "open", false);
        let closed = Note::new("2", "closed", true);
        assert!(StatusFilter::All.matches(&open) && StatusFilter::All.matches(&closed));
        assert!(StatusFilter::Todo.matches(&open) && !StatusFilter::Todo.matches(&closed));
        assert!(!StatusFilter::Done.matches(&open) && StatusFilter::Done.matches(&closed));
    }

    #[test]
    fn view_state_combines_filter_and_search() {
        let view = ViewState {
            filter: StatusFilter::Done,
            search_text: "MILK".to_string(),
        };
        assert!(view.matches(&Note::new("1", "Buy milk", true)));
        assert!(!view.matches(&Note::new("2", "Buy milk", false)));
        assert!(!view.matches(&Note::new("3", "Call mom", true)));
    }
}
