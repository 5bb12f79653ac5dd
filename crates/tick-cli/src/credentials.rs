//! OS keychain backing for the session credential store.

use keyring::Entry;
use tick_core::store::{KeyValueStore, StoreError, StoreResult};

const KEYRING_SERVICE_NAME: &str = "tick-cli";

/// One keychain entry per key, all under the same service.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service_name: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self {
            service_name: KEYRING_SERVICE_NAME.to_string(),
        }
    }
}

impl KeyringStore {
    fn entry(&self, key: &str) -> StoreResult<Entry> {
        Entry::new(&self.service_name, key)
            .map_err(|error| StoreError::Unavailable(error.to_string()))
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(StoreError::Backend(error.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|error| StoreError::Backend(error.to_string()))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(StoreError::Backend(error.to_string())),
        }
    }
}
