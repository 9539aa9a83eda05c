use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use super::{StoreError, StoreResult, UserId, UserRecord, UserStore, WordId, WordRecord, WordStore};

/// Word and user records kept in a local `SQLite` database.
///
/// A fresh connection is opened per operation on the blocking thread pool, so the
/// store is cheap to share between concurrently handled messages.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let store = Self { db_path };
        let conn = connect(&store.db_path)
            .with_context(|| format!("Failed to open database: {}", store.db_path.display()))?;
        init_db(&conn).context("Failed to initialize word database")?;

        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = connect(&db_path)?;
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("database task failed: {e}")))?
    }
}

fn connect(db_path: &Path) -> rusqlite::Result<Connection> {
    Connection::open(db_path)
}

fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            original TEXT NOT NULL,
            translation TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_words_owner ON words(owner);",
    )
}

// Ids this store did not issue can never match a row.
fn row_id(id: &WordId) -> StoreResult<i64> {
    id.as_str().parse().map_err(|_| StoreError::NotFound)
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn ensure_user(&self, user: &UserId) -> StoreResult<UserRecord> {
        let user = user.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO users (id) VALUES (?1)",
                [user.as_str()],
            )?;
            Ok(UserRecord { id: user })
        })
        .await
    }

    async fn get_user(&self, user: &UserId) -> StoreResult<UserRecord> {
        let user = user.clone();
        self.run(move |conn| {
            let found: Option<String> = conn
                .query_row(
                    "SELECT id FROM users WHERE id = ?1",
                    [user.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            found
                .map(|id| UserRecord {
                    id: UserId::new(id),
                })
                .ok_or(StoreError::NotFound)
        })
        .await
    }
}

#[async_trait]
impl WordStore for SqliteStore {
    async fn add_word(
        &self,
        user: &UserId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord> {
        let (user, word, translation) = (user.clone(), word.to_string(), translation.to_string());
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO words (owner, original, translation) VALUES (?1, ?2, ?3)",
                params![user.as_str(), word, translation],
            )?;
            Ok(WordRecord {
                id: WordId::new(conn.last_insert_rowid().to_string()),
                owner: user,
                original: word,
                translation,
            })
        })
        .await
    }

    async fn list_words(&self, user: &UserId) -> StoreResult<Vec<WordRecord>> {
        let user = user.clone();
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, original, translation FROM words WHERE owner = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([user.as_str()], |row| {
                Ok(WordRecord {
                    id: WordId::new(row.get::<_, i64>(0)?.to_string()),
                    owner: user.clone(),
                    original: row.get(1)?,
                    translation: row.get(2)?,
                })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn update_word(
        &self,
        user: &UserId,
        id: &WordId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord> {
        let row = row_id(id)?;
        let (user, id, word, translation) = (
            user.clone(),
            id.clone(),
            word.to_string(),
            translation.to_string(),
        );
        self.run(move |conn| {
            let changed = conn.execute(
                "UPDATE words SET original = ?1, translation = ?2 WHERE id = ?3 AND owner = ?4",
                params![word, translation, row, user.as_str()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(WordRecord {
                id,
                owner: user,
                original: word,
                translation,
            })
        })
        .await
    }

    async fn delete_word(&self, user: &UserId, id: &WordId) -> StoreResult<()> {
        let row = row_id(id)?;
        let user = user.clone();
        self.run(move |conn| {
            let changed = conn.execute(
                "DELETE FROM words WHERE id = ?1 AND owner = ?2",
                params![row, user.as_str()],
            )?;
            if changed == 0 {
                Err(StoreError::NotFound)
            } else {
                Ok(())
            }
        })
        .await
    }
}
