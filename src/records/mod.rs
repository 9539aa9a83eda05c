//! User and word record collaborators.
//!
//! The dialogue engine never owns persistence; it talks to a [`UserStore`] and a
//! [`WordStore`]. Three backends are provided: in-memory, local `SQLite`, and the
//! remote user/dictionary HTTP services.

mod http;
mod memory;
mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Stable identity of an end user, as supplied by the delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a word record. Only the store that issued it interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub id: WordId,
    pub owner: UserId,
    pub original: String,
    pub translation: String,
}

/// Failure reported by a record collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The user or word does not exist (or is not owned by the caller).
    #[error("record not found")]
    NotFound,
    /// Storage or network failure; the caller may retry later.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            Self::NotFound
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the user record if it does not exist yet.
    async fn ensure_user(&self, user: &UserId) -> StoreResult<UserRecord>;

    async fn get_user(&self, user: &UserId) -> StoreResult<UserRecord>;
}

#[async_trait]
pub trait WordStore: Send + Sync {
    async fn add_word(
        &self,
        user: &UserId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord>;

    /// Returns the user's words, oldest first.
    async fn list_words(&self, user: &UserId) -> StoreResult<Vec<WordRecord>>;

    /// Overwrites a word owned by `user`. Ids owned by someone else are `NotFound`.
    async fn update_word(
        &self,
        user: &UserId,
        id: &WordId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord>;

    async fn delete_word(&self, user: &UserId, id: &WordId) -> StoreResult<()>;
}
