//! Session storage backed by the OS keyring (`keyring` crate).

use std::collections::hash_map::{self, HashMap};
use std::sync::Mutex;

use keyring::Entry;
use notesync_core::storage::{KeyValueStorage, StorageError, StorageResult};

pub const KEYRING_SERVICE_NAME: &str = "notesync";

/// One keyring credential per storage key, under the account `{profile}:{key}`.
#[derive(Debug)]
pub struct KeyringStorage {
    service_name: String,
    profile_name: String,
    entries: Mutex<HashMap<String, Entry>>,
}

impl KeyringStorage {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self::with_service(KEYRING_SERVICE_NAME, profile_name)
    }

    pub fn with_service(service_name: impl Into<String>, profile_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            profile_name: profile_name.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn account(&self, key: &str) -> String {
        format!("{}:{key}", self.profile_name)
    }

    fn with_entry<T>(
        &self,
        key: &str,
        apply: impl FnOnce(&Entry) -> keyring::Result<T>,
    ) -> StorageResult<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|error| StorageError::Poisoned(error.to_string()))?;
        let entry = match entries.entry(key.to_string()) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => slot.insert(
                Entry::new(&self.service_name, &self.account(key)).map_err(secure_storage_error)?,
            ),
        };
        apply(entry).map_err(secure_storage_error)
    }
}

fn secure_storage_error(error: keyring::Error) -> StorageError {
    StorageError::SecureStorage(error.to_string())
}

impl KeyValueStorage for KeyringStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(error),
        })
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_entry(key, |entry| entry.set_password(value))
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.with_entry(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(error),
        })
    }
}

#[cfg(test)]
pub fn use_mock_keyring() {
    keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
}
