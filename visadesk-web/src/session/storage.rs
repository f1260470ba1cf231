//! Durable key-value storage for the persisted session.
//!
//! Three string entries survive page reloads: the JSON-encoded user, the raw
//! bearer token, and the JSON-encoded applicant profile. User and token are
//! written and removed as a pair.

use super::state::Credentials;
use gloo_storage::{LocalStorage, Storage};
use shared::models::{Profile, User};
use std::{cell::RefCell, collections::HashMap};
use thiserror::Error;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "access_token";
pub const PROFILE_KEY: &str = "profil";
/// Entries older builds wrote that no longer carry session data. Teardown still removes them.
pub const LEGACY_KEYS: [&str; 1] = ["custom"];

/// Values older builds wrote in place of a missing entry.
const ABSENT_SENTINELS: [&str; 3] = ["", "null", "undefined"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write storage entry `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode storage entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Client-local persistent string storage.
pub trait DurableStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`, accessed through `gloo-storage`.
#[derive(Debug, Clone, Copy)]
pub struct BrowserStorage {
    _private: (),
}

impl BrowserStorage {
    /// Returns `None` when the page has no usable local storage (private mode, SSR).
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        window.local_storage().ok().flatten()?;
        Some(Self { _private: () })
    }
}

impl DurableStorage for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: format!("{err:?}"),
            })
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// Process-local storage used when the browser offers none, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    #[cfg(test)]
    rejected_keys: RefCell<Vec<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        storage.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        storage
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    #[cfg(test)]
    pub(crate) fn reject_writes_to(&self, key: &str) {
        self.rejected_keys.borrow_mut().push(key.to_string());
    }

    #[cfg(test)]
    fn rejects(&self, key: &str) -> bool {
        self.rejected_keys.borrow().iter().any(|rejected| rejected == key)
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self)]
    fn rejects(&self, _key: &str) -> bool {
        false
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.rejects(key) {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Whatever a previous run left behind, already validated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub credentials: Option<Credentials>,
    pub profile: Option<Profile>,
}

fn read_entry(storage: &dyn DurableStorage, key: &str) -> Option<String> {
    storage
        .read(key)
        .filter(|value| !ABSENT_SENTINELS.contains(&value.trim()))
}

fn read_json<T: serde::de::DeserializeOwned>(storage: &dyn DurableStorage, key: &str) -> Option<T> {
    let raw = read_entry(storage, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!("ignoring malformed storage entry `{key}`: {err}");
            None
        }
    }
}

/// Load the persisted session. Missing, sentinel or unparsable entries read as absent.
pub fn load(storage: &dyn DurableStorage) -> PersistedSession {
    let token = read_entry(storage, TOKEN_KEY);
    let user = read_json::<User>(storage, USER_KEY);
    let credentials = match (user, token) {
        (Some(user), Some(token)) => Some(Credentials::new(user, token)),
        _ => None,
    };
    let profile = credentials
        .as_ref()
        .and_then(|_| read_json::<Profile>(storage, PROFILE_KEY));
    PersistedSession {
        credentials,
        profile,
    }
}

/// Write user and token as a pair. A failed token write removes the user entry again.
pub fn save_credentials(
    storage: &dyn DurableStorage,
    credentials: &Credentials,
) -> Result<(), StorageError> {
    save_user(storage, &credentials.user)?;
    if let Err(err) = storage.write(TOKEN_KEY, &credentials.token) {
        storage.remove(USER_KEY);
        return Err(err);
    }
    Ok(())
}

pub fn save_user(storage: &dyn DurableStorage, user: &User) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(user)?;
    storage.write(USER_KEY, &encoded)
}

/// Store `profile`, or remove the entry when there is none.
pub fn save_profile(
    storage: &dyn DurableStorage,
    profile: Option<&Profile>,
) -> Result<(), StorageError> {
    match profile {
        Some(profile) => {
            let encoded = serde_json::to_string(profile)?;
            storage.write(PROFILE_KEY, &encoded)
        }
        None => {
            storage.remove(PROFILE_KEY);
            Ok(())
        }
    }
}

pub fn clear(storage: &dyn DurableStorage) {
    storage.remove(USER_KEY);
    storage.remove(TOKEN_KEY);
    storage.remove(PROFILE_KEY);
    for key in LEGACY_KEYS {
        storage.remove(key);
    }
}
