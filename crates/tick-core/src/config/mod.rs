//! Client configuration for the remote notes API.
//!
//! A single base URL is shared by the auth and todo endpoints. It is resolved
//! once by the caller and handed to the HTTP clients at construction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";

/// Environment variable frontends consult for the base URL.
pub const API_BASE_ENV_VAR: &str = "TICK_API_BASE";

/// Resolved remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Builds a config for an explicit base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
        })
    }

    /// Picks the first non-empty candidate, in order, or the default.
    pub fn resolve<I>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let chosen = candidates
            .into_iter()
            .find_map(normalize_text_option)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self::new(chosen)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an absolute API path (e.g. `/api/todos`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfiguration(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidConfiguration(format!(
            "API base URL must include http:// or https:// (got '{trimmed}')"
        )));
    }
    Ok(trimmed.to_string())
}
