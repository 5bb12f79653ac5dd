//! Remote auth API client.

use std::fmt;
use std::future::Future;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ApiConfig;

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";

pub const REGISTER_FALLBACK_ERROR: &str = "Failed to register";
pub const LOGIN_FALLBACK_ERROR: &str = "Invalid email or password.";

/// Successful register/login payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub token: String,
}

impl AuthUser {
    /// Name to greet the user with: username when present, otherwise email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Api(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Remote operations the session manager depends on.
pub trait AuthBackend: Send + Sync {
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<AuthUser>> + Send;

    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<AuthUser>> + Send;
}

/// HTTP implementation of [`AuthBackend`].
#[derive(Debug, Clone)]
pub struct AuthApiClient {
    config: ApiConfig,
    client: Client,
}

impl AuthApiClient {
    pub fn new(config: ApiConfig) -> AuthResult<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    async fn send_auth_request(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> AuthResult<AuthUser> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Auth request rejected with HTTP {}", status.as_u16());
            return Err(AuthError::Api(
                parse_api_error(&body).unwrap_or_else(|| fallback.to_string()),
            ));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl AuthBackend for AuthApiClient {
    async fn register(&self, username: &str, email: &str, password: &str) -> AuthResult<AuthUser> {
        let payload = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        let request = self
            .client
            .post(self.config.endpoint(REGISTER_PATH))
            .json(&payload);
        self.send_auth_request(request, REGISTER_FALLBACK_ERROR)
            .await
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let request = self
            .client
            .post(self.config.endpoint(LOGIN_PATH))
            .json(&payload);
        self.send_auth_request(request, LOGIN_FALLBACK_ERROR).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Extracts the `error` field of a rejected auth response, if any.
fn parse_api_error(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::{AuthBackend, AuthError, AuthResult, AuthUser};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AuthCall {
        Register { username: String, email: String },
        Login { email: String },
    }

    /// Accepts any password equal to `"pw1"`; everything else is rejected.
    #[derive(Debug, Clone, Default)]
    pub struct FakeAuthBackend {
        calls: Arc<Mutex<Vec<AuthCall>>>,
        offline: Arc<Mutex<bool>>,
        blank_token: Arc<Mutex<bool>>,
    }

    impl FakeAuthBackend {
        pub const PASSWORD: &'static str = "pw1";

        pub fn calls(&self) -> Vec<AuthCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn set_offline(&self, offline: bool) {
            *self.offline.lock().unwrap() = offline;
        }

        /// Successful responses carry an empty token.
        pub fn set_blank_token(&self, blank: bool) {
            *self.blank_token.lock().unwrap() = blank;
        }

        pub fn token_for(email: &str) -> String {
            format!("token-for-{email}")
        }

        fn respond(&self, username: Option<&str>, email: &str, password: &str) -> AuthResult<AuthUser> {
            if *self.offline.lock().unwrap() {
                return Err(AuthError::Json(serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))));
            }
            if password != Self::PASSWORD {
                return Err(AuthError::Api("Invalid credentials".to_string()));
            }
            Ok(AuthUser {
                id: "user-1".to_string(),
                email: email.to_string(),
                username: username.map(str::to_string),
                token: if *self.blank_token.lock().unwrap() {
                    String::new()
                } else {
                    Self::token_for(email)
                },
            })
        }
    }

    impl AuthBackend for FakeAuthBackend {
        async fn register(&self, username: &str, email: &str, password: &str) -> AuthResult<AuthUser> {
            self.calls.lock().unwrap().push(AuthCall::Register {
                username: username.to_string(),
                email: email.to_string(),
            });
            self.respond(Some(username), email, password)
        }

        async fn login(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
            self.calls.lock().unwrap().push(AuthCall::Login {
                email: email.to_string(),
            });
            let username = email.split('@').next();
            self.respond(username, email, password)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_api_error_reads_error_field() {
        assert_eq!(
            parse_api_error(r#"{"error":" Email already in use "}"#).as_deref(),
            Some("Email already in use")
        );
    }

    #[test]
    fn parse_api_error_ignores_missing_or_invalid_payloads() {
        assert_eq!(parse_api_error(""), None);
        assert_eq!(parse_api_error("<html>502</html>"), None);
        assert_eq!(parse_api_error(r#"{"message":"nope"}"#), None);
        assert_eq!(parse_api_error(r#"{"error":""}"#), None);
    }

    #[test]
    fn display_name_prefers_username() {
        let mut user = AuthUser {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            username: Some("alice".to_string()),
            token: "secret".to_string(),
        };
        assert_eq!(user.display_name(), "alice");
        user.username = Some("  ".to_string());
        assert_eq!(user.display_name(), "a@x.com");
        user.username = None;
        assert_eq!(user.display_name(), "a@x.com");
    }

    #[test]
    fn auth_user_debug_redacts_token() {
        let user = AuthUser {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            username: None,
            token: "secret-token".to_string(),
        };
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
