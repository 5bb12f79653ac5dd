//! tick-core - Core library for tick
//!
//! Session handling, the remote todo gateway and the note list controller
//! shared by tick frontends.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notes;
pub mod session;
pub mod store;
pub mod todos;
pub mod util;

pub use app::TodoApp;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use models::{Note, NoteId, StatusFilter};
