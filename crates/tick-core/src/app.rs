//! Session + note list coordination.
//!
//! `TodoApp` is what a frontend drives. It keeps the note list tied to the
//! signed-in session: notes are hydrated after every successful sign-in and
//! dropped on sign-out.

use crate::auth::{AuthApiClient, AuthBackend};
use crate::config::ApiConfig;
use crate::models::{Note, NoteId, StatusFilter};
use crate::notes::NoteListController;
use crate::session::{AuthMode, SessionManager};
use crate::store::KeyValueStore;
use crate::todos::{TodoApiClient, TodoBackend};
use crate::Result;

pub struct TodoApp<A: AuthBackend, K: KeyValueStore, B: TodoBackend> {
    session: SessionManager<A, K>,
    notes: NoteListController<B>,
}

impl<K: KeyValueStore> TodoApp<AuthApiClient, K, TodoApiClient> {
    /// Builds an app talking HTTP to `config`'s base URL.
    pub fn connect(config: &ApiConfig, store: K) -> Result<Self> {
        let auth = AuthApiClient::new(config.clone())?;
        let todos = TodoApiClient::new(config.clone())?;
        Ok(Self::new(auth, store, todos))
    }
}

impl<A: AuthBackend, K: KeyValueStore, B: TodoBackend> TodoApp<A, K, B> {
    pub fn new(auth: A, store: K, todos: B) -> Self {
        Self {
            session: SessionManager::new(auth, store),
            notes: NoteListController::new(todos),
        }
    }

    /// Resume a persisted session and hydrate its notes.
    pub async fn restore(&mut self) -> bool {
        if !self.session.restore() {
            return false;
        }
        self.notes.hydrate(self.session.token()).await;
        true
    }

    /// Resume a persisted session without fetching the list.
    pub fn restore_session(&mut self) -> bool {
        self.session.restore()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        if !self.session.login(email, password).await {
            return false;
        }
        self.notes.hydrate(self.session.token()).await;
        true
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> bool {
        self.session
            .register(username, email, password, confirm_password)
            .await
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.session.switch_mode(mode);
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.notes.clear();
    }

    /// Re-fetch the list for the current session.
    pub async fn refresh(&mut self) -> usize {
        self.notes.hydrate(self.session.token()).await
    }

    pub fn toggle_done(&mut self, index: usize) -> bool {
        self.notes.toggle_done(index)
    }

    pub async fn create_or_update(&mut self, title: &str) -> bool {
        self.notes
            .create_or_update(self.session.token(), title)
            .await
    }

    pub async fn delete(&mut self, id: &NoteId) -> bool {
        self.notes.delete(self.session.token(), id).await
    }

    pub fn derived_view(&self, filter: StatusFilter, search_text: &str) -> Vec<&Note> {
        self.notes.derived_view(filter, search_text)
    }

    pub const fn session(&self) -> &SessionManager<A, K> {
        &self.session
    }

    pub const fn notes(&self) -> &NoteListController<B> {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteListController<B> {
        &mut self.notes
    }
}
