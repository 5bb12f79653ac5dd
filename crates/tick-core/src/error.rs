//! Error types for tick-core

use thiserror::Error;

/// Result type alias using tick-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tick-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Remote auth API error
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),

    /// Remote todo API error
    #[error(transparent)]
    Todo(#[from] crate::todos::TodoApiError),
}
