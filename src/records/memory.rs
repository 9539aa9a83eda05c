use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StoreError, StoreResult, UserId, UserRecord, UserStore, WordId, WordRecord, WordStore};

#[derive(Default)]
struct Inner {
    users: HashSet<UserId>,
    // Keyed by a monotonically increasing id, so iteration is insertion order.
    words: BTreeMap<u64, WordRecord>,
    next_id: u64,
}

/// Process-local record store. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_id(id: &WordId) -> StoreResult<u64> {
    id.as_str().parse().map_err(|_| StoreError::NotFound)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn ensure_user(&self, user: &UserId) -> StoreResult<UserRecord> {
        self.lock().users.insert(user.clone());
        Ok(UserRecord { id: user.clone() })
    }

    async fn get_user(&self, user: &UserId) -> StoreResult<UserRecord> {
        if self.lock().users.contains(user) {
            Ok(UserRecord { id: user.clone() })
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn add_word(
        &self,
        user: &UserId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let key = inner.next_id;
        let record = WordRecord {
            id: WordId::new(key.to_string()),
            owner: user.clone(),
            original: word.to_string(),
            translation: translation.to_string(),
        };
        inner.words.insert(key, record.clone());
        Ok(record)
    }

    async fn list_words(&self, user: &UserId) -> StoreResult<Vec<WordRecord>> {
        Ok(self
            .lock()
            .words
            .values()
            .filter(|w| &w.owner == user)
            .cloned()
            .collect())
    }

    async fn update_word(
        &self,
        user: &UserId,
        id: &WordId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord> {
        let key = parse_id(id)?;
        let mut inner = self.lock();
        let record = inner
            .words
            .get_mut(&key)
            .filter(|w| &w.owner == user)
            .ok_or(StoreError::NotFound)?;
        record.original = word.to_string();
        record.translation = translation.to_string();
        Ok(record.clone())
    }

    async fn delete_word(&self, user: &UserId, id: &WordId) -> StoreResult<()> {
        let key = parse_id(id)?;
        let mut inner = self.lock();
        let owned = inner.words.get(&key).is_some_and(|w| &w.owner == user);
        if !owned {
            return Err(StoreError::NotFound);
        }
        inner.words.remove(&key);
        Ok(())
    }
}
