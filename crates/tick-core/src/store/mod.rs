//! Credential persistence on top of an injected key-value store.
//!
//! Frontends supply a [`KeyValueStore`] (the CLI uses the OS keyring); tests
//! use [`MemoryStore`]. [`CredentialStore`] never surfaces store failures to
//! its callers: a broken store behaves like an empty one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const EMAIL_KEY: &str = "email";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Key-value store is unavailable: {0}")]
    Unavailable(String),
    #[error("Key-value store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal persistent string map.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|error| StoreError::Backend(error.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Cached display identity stored next to the token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredIdentity {
    pub user_name: Option<String>,
    pub email: Option<String>,
}

/// Session token and identity persistence.
#[derive(Clone)]
pub struct CredentialStore<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> fmt::Debug for CredentialStore<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl<K: KeyValueStore> CredentialStore<K> {
    pub const fn new(store: K) -> Self {
        Self { store }
    }

    pub fn save(&self, token: &str) {
        if let Err(error) = self.store.set(TOKEN_KEY, token) {
            tracing::warn!("Failed to persist session token: {}", error);
        }
    }

    /// Returns the stored token, treating empty values and failures as absent.
    pub fn load(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    /// Removes the token and the cached identity.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USERNAME_KEY, EMAIL_KEY] {
            if let Err(error) = self.store.remove(key) {
                tracing::warn!("Failed to clear '{}' from credential store: {}", key, error);
            }
        }
    }

    pub fn save_identity(&self, user_name: &str, email: &str) {
        for (key, value) in [(USERNAME_KEY, user_name), (EMAIL_KEY, email)] {
            let result = if value.is_empty() {
                self.store.remove(key)
            } else {
                self.store.set(key, value)
            };
            if let Err(error) = result {
                tracing::warn!("Failed to persist '{}' in credential store: {}", key, error);
            }
        }
    }

    pub fn load_identity(&self) -> StoredIdentity {
        StoredIdentity {
            user_name: self.read(USERNAME_KEY),
            email: self.read(EMAIL_KEY),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(error) => {
                tracing::warn!("Failed to read '{}' from credential store: {}", key, error);
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::UnavailableStore;
    use super::*;

    #[test]
    fn save_then_load_returns_token() {
        let credentials = CredentialStore::new(MemoryStore::new());
        credentials.save("abc123");
        assert_eq!(credentials.load().as_deref(), Some("abc123"));
    }

    #[test]
    fn load_treats_empty_token_as_absent() {
        let backing = MemoryStore::new();
        backing.set(TOKEN_KEY, "").unwrap();
        assert_eq!(CredentialStore::new(backing).load(), None);
    }

    #[test]
    fn clear_removes_token_and_identity() {
        let backing = MemoryStore::new();
        let credentials = CredentialStore::new(backing.clone());
        credentials.save("abc123");
        credentials.save_identity("alice", "a@x.com");

        credentials.clear();

        assert_eq!(credentials.load(), None);
        assert_eq!(credentials.load_identity(), StoredIdentity::default());
        assert_eq!(backing.get(USERNAME_KEY).unwrap(), None);
    }

    #[test]
    fn identity_roundtrip() {
        let credentials = CredentialStore::new(MemoryStore::new());
        credentials.save_identity("alice", "a@x.com");
        assert_eq!(
            credentials.load_identity(),
            StoredIdentity {
                user_name: Some("alice".to_string()),
                email: Some("a@x.com".to_string()),
            }
        );
    }

    #[test]
    fn unavailable_store_degrades_to_no_op() {
        let credentials = CredentialStore::new(UnavailableStore);
        credentials.save("abc123");
        credentials.save_identity("alice", "a@x.com");
        credentials.clear();
        assert_eq!(credentials.load(), None);
        assert_eq!(credentials.load_identity(), StoredIdentity::default());
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let first = MemoryStore::new();
        let second = first.clone();
        first.set("k", "v").unwrap();
        assert_eq!(second.get("k").unwrap().as_deref(), Some("v"));
    }
}
