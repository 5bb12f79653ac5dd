//! Auth session state machine.
//!
//! The manager owns the login/register form state, the active session and
//! the single form-level error message. Remote failures never escape as
//! `Err`: they become the error message and the state stays where it was.

use std::fmt;

use crate::auth::{AuthBackend, AuthError};
use crate::store::{CredentialStore, KeyValueStore};

pub const MISSING_REGISTER_FIELDS: &str = "Username, email and password are required.";
pub const MISSING_LOGIN_FIELDS: &str = "Email and password are required.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
const LOGIN_SERVER_ERROR: &str = "Server error while logging in";
const REGISTER_SERVER_ERROR: &str = "Server error while registering";

/// Which form is shown while signed out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated { mode: AuthMode },
    Authenticated,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Unauthenticated {
            mode: AuthMode::Login,
        }
    }
}

/// Signed-in identity and bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_name: String,
    pub email: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

pub struct SessionManager<A: AuthBackend, K: KeyValueStore> {
    auth: A,
    credentials: CredentialStore<K>,
    state: SessionState,
    session: Option<Session>,
    login_form: LoginForm,
    register_form: RegisterForm,
    error: Option<String>,
}

impl<A: AuthBackend, K: KeyValueStore> SessionManager<A, K> {
    pub fn new(auth: A, store: K) -> Self {
        Self {
            auth,
            credentials: CredentialStore::new(store),
            state: SessionState::default(),
            session: None,
            login_form: LoginForm::default(),
            register_form: RegisterForm::default(),
            error: None,
        }
    }

    /// Resumes a persisted session, if the store still holds a token.
    pub fn restore(&mut self) -> bool {
        let Some(token) = self.credentials.load() else {
            return false;
        };
        let identity = self.credentials.load_identity();
        let email = identity.email.unwrap_or_default();
        let user_name = identity.user_name.unwrap_or_else(|| email.clone());

        tracing::info!("Restored persisted session for {}", user_name);
        self.session = Some(Session {
            token,
            user_name,
            email,
        });
        self.state = SessionState::Authenticated;
        true
    }

    /// Switch between the login and register forms. Clears the error.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        if let SessionState::Unauthenticated { .. } = self.state {
            self.state = SessionState::Unauthenticated { mode };
        }
        self.error = None;
    }

    /// Returns whether the session is now authenticated.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.error = None;
        self.login_form = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        };
        if self.state != SessionState::Authenticated {
            self.state = SessionState::Unauthenticated {
                mode: AuthMode::Login,
            };
        }

        if email.trim().is_empty() || password.is_empty() {
            self.error = Some(MISSING_LOGIN_FIELDS.to_string());
            return false;
        }

        match self.auth.login(email, password).await {
            Ok(user) if user.token.trim().is_empty() => {
                tracing::warn!("Login for {} returned no token", user.email);
                self.error = Some(LOGIN_SERVER_ERROR.to_string());
                false
            }
            Ok(user) => {
                let user_name = user.display_name().to_string();
                self.credentials.save(&user.token);
                self.credentials.save_identity(&user_name, &user.email);
                tracing::info!("Signed in as {}", user_name);

                self.session = Some(Session {
                    token: user.token,
                    user_name,
                    email: user.email,
                });
                self.state = SessionState::Authenticated;
                self.login_form = LoginForm::default();
                true
            }
            Err(error) => {
                self.error = Some(form_message(error, LOGIN_SERVER_ERROR));
                false
            }
        }
    }

    /// Registers a new account without signing in.
    ///
    /// Returns whether the remote registration succeeded; the caller decides
    /// when to show the login form.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> bool {
        self.error = None;
        self.register_form = RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        };

        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            self.error = Some(MISSING_REGISTER_FIELDS.to_string());
            return false;
        }
        if password != confirm_password {
            self.error = Some(PASSWORD_MISMATCH.to_string());
            return false;
        }

        match self.auth.register(username, email, password).await {
            Ok(user) => {
                tracing::info!("Registered account {}", user.email);
                self.register_form = RegisterForm::default();
                true
            }
            Err(error) => {
                self.error = Some(form_message(error, REGISTER_SERVER_ERROR));
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.credentials.clear();
        if let Some(session) = self.session.take() {
            tracing::info!("Signed out {}", session.user_name);
        }
        self.state = SessionState::default();
        self.login_form = LoginForm::default();
        self.register_form = RegisterForm::default();
        self.error = None;
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The active form, or `None` while signed in.
    pub const fn mode(&self) -> Option<AuthMode> {
        match self.state {
            SessionState::Unauthenticated { mode } => Some(mode),
            SessionState::Authenticated => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.token.is_empty())
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    pub fn user_name(&self) -> &str {
        self.session
            .as_ref()
            .map_or("", |session| session.user_name.as_str())
    }

    pub fn email(&self) -> &str {
        self.session
            .as_ref()
            .map_or("", |session| session.email.as_str())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub const fn register_form(&self) -> &RegisterForm {
        &self.register_form
    }
}

fn form_message(error: AuthError, server_fallback: &str) -> String {
    match error {
        AuthError::Api(message) => message,
        other => {
            tracing::warn!("Auth request failed: {}", other);
            server_fallback.to_string()
        }
    }
}
