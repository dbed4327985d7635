//! Persistence layer for farmai.
//!
//! Everything is stored as JSON values in a key-value store:
//!
//! | Key                        | Value                               |
//! |----------------------------|-------------------------------------|
//! | `scanHistory-<user_id>`    | scan history array, newest first    |
//! | `stockItems-<user_id>`     | stock item array                    |
//! | `farmAiAllUsers`           | registered users                    |
//! | `farmAiCredentials`        | email → password digest             |
//! | `farmAiUser`               | current session user                |
//!
//! [`MemoryStore`] backs tests; [`SqliteStore`] backs the app.

mod accounts;
mod history;
mod memory;
mod schema;
mod sqlite;
mod stock;
#[cfg(test)]
pub(crate) mod testing;

pub use accounts::*;
pub use history::*;
pub use memory::*;
pub use schema::*;
pub use sqlite::*;
pub use stock::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal durable key-value interface (string keys, string values).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Read and decode a JSON value. Missing keys yield `None`.
pub fn get_json<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>> {
    kv.get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(Into::into)
}

/// Encode and write a JSON value.
pub fn set_json<T: Serialize + ?Sized>(kv: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}

/// Validate a user ID used to scope a key.
pub(crate) fn require_user(user_id: &str) -> StoreResult<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(StoreError::InvalidInput("user id is required".into()));
    }
    Ok(user_id)
}
