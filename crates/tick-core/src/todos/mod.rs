//! Remote todo API client and gateway.
//!
//! [`TodoApiClient`] speaks HTTP and reports every failure as a
//! [`TodoApiError`]. [`RemoteTodoGateway`] sits on top of any [`TodoBackend`]
//! and turns failures into log lines plus an empty/negative result, so the
//! note list never has to handle remote errors itself.

use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::{Note, NoteId};
use crate::util::compact_text;

const TODOS_PATH: &str = "/api/todos";

#[derive(Debug, Error)]
pub enum TodoApiError {
    #[error("Todo API HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Todo API error: {0}")]
    Api(String),
    #[error("Invalid todo payload: {0}")]
    InvalidPayload(String),
}

pub type TodoResult<T> = Result<T, TodoApiError>;

/// Remote todo persistence.
///
/// `token` is `None` when no session is known; implementations still issue
/// the request.
pub trait TodoBackend: Send + Sync {
    fn list(&self, token: Option<&str>) -> impl Future<Output = TodoResult<Vec<Note>>> + Send;

    fn create(
        &self,
        token: Option<&str>,
        title: &str,
    ) -> impl Future<Output = TodoResult<Note>> + Send;

    fn remove(
        &self,
        token: Option<&str>,
        id: &NoteId,
    ) -> impl Future<Output = TodoResult<()>> + Send;
}

/// HTTP implementation of [`TodoBackend`].
#[derive(Debug, Clone)]
pub struct TodoApiClient {
    config: ApiConfig,
    client: Client,
}

impl TodoApiClient {
    pub fn new(config: ApiConfig) -> TodoResult<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn authorized(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        request
            .header(AUTHORIZATION, authorization_value(token))
            .header(ACCEPT, "application/json")
    }

    async fn send(request: RequestBuilder, action: &str) -> TodoResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TodoApiError::Api(describe_failure(action, status, &body)))
    }
}

impl TodoBackend for TodoApiClient {
    async fn list(&self, token: Option<&str>) -> TodoResult<Vec<Note>> {
        let url = self.config.endpoint(TODOS_PATH);
        tracing::debug!("GET {}", url);
        let request = Self::authorized(self.client.get(url), token);
        let response = Self::send(request, "list todos").await?;
        let records = response
            .json::<Vec<TodoRecord>>()
            .await
            .map_err(|error| TodoApiError::InvalidPayload(error.to_string()))?;
        Ok(records
            .into_iter()
            .map(|record| record.into_note(""))
            .collect())
    }

    async fn create(&self, token: Option<&str>, title: &str) -> TodoResult<Note> {
        let url = self.config.endpoint(TODOS_PATH);
        tracing::debug!("POST {}", url);
        let request = Self::authorized(
            self.client
                .post(url)
                .json(&serde_json::json!({ "title": title })),
            token,
        );
        let response = Self::send(request, "create todo").await?;
        let record = response
            .json::<TodoRecord>()
            .await
            .map_err(|error| TodoApiError::InvalidPayload(error.to_string()))?;
        Ok(record.into_note(title))
    }

    async fn remove(&self, token: Option<&str>, id: &NoteId) -> TodoResult<()> {
        let url = format!(
            "{}/{}",
            self.config.endpoint(TODOS_PATH),
            urlencoding::encode(id.as_str())
        );
        tracing::debug!("DELETE {}", url);
        let request = Self::authorized(self.client.delete(url), token);
        Self::send(request, "delete todo").await?;
        Ok(())
    }
}

/// Error-absorbing facade used by the note list.
#[derive(Debug, Clone)]
pub struct RemoteTodoGateway<B: TodoBackend> {
    backend: B,
}

impl<B: TodoBackend> RemoteTodoGateway<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// All todos for the session; empty on failure.
    pub async fn list(&self, token: Option<&str>) -> Vec<Note> {
        match self.backend.list(token).await {
            Ok(notes) => {
                tracing::debug!("Fetched {} todos", notes.len());
                notes
            }
            Err(error) => {
                tracing::error!("Failed to fetch todos: {}", error);
                Vec::new()
            }
        }
    }

    /// The remote-assigned note, or `None` on failure.
    pub async fn create(&self, token: Option<&str>, title: &str) -> Option<Note> {
        match self.backend.create(token, title).await {
            Ok(note) => Some(note),
            Err(error) => {
                tracing::error!("Failed to save todo: {}", error);
                None
            }
        }
    }

    /// Whether the remote delete was confirmed.
    pub async fn remove(&self, token: Option<&str>, id: &NoteId) -> bool {
        match self.backend.remove(token, id).await {
            Ok(()) => true,
            Err(error) => {
                tracing::error!("Failed to delete todo {}: {}", id, error);
                false
            }
        }
    }
}

/// `Bearer <token>`, or an empty value when there is no usable token.
pub fn authorization_value(token: Option<&str>) -> String {
    token
        .filter(|token| !token.trim().is_empty())
        .map_or_else(String::new, |token| format!("Bearer {token}"))
}

/// Remote todo as returned by the API.
#[derive(Debug, Deserialize)]
struct TodoRecord {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    done: Option<bool>,
}

impl TodoRecord {
    fn into_note(self, fallback_title: &str) -> Note {
        Note {
            id: NoteId::new(self.id),
            title: self.title.unwrap_or_else(|| fallback_title.to_string()),
            done: self.completed.or(self.done).unwrap_or(false),
        }
    }
}

fn describe_failure(action: &str, status: StatusCode, body: &str) -> String {
    let body = compact_text(body);
    if body.is_empty() {
        format!("{action} failed with HTTP {}", status.as_u16())
    } else {
        format!("{action} failed with HTTP {}: {body}", status.as_u16())
    }
}
