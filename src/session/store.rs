use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::state::ConversationSession;
use crate::records::UserId;

/// When the store may forget a user's session.
///
/// A forgotten user simply starts again at `Idle` on their next message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Keep every session for the life of the process. Memory grows with the
    /// number of distinct users, so only use this when that number is bounded.
    #[default]
    Unbounded,
    /// Keep at most `capacity` sessions, dropping the least recently used one.
    LeastRecentlyUsed { capacity: NonZeroUsize },
    /// Drop sessions untouched for longer than the given duration on [`SessionStore::evict`],
    /// which the dialogue engine runs before every message.
    IdleFor(Duration),
}

#[derive(Debug)]
struct Entry {
    session: ConversationSession,
    last_seen: Instant,
    // Key into `Inner::recency`; `Instant` can tie under a coarse or paused clock.
    tick: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<UserId, Entry>,
    /// Users ordered from least to most recently seen.
    recency: BTreeMap<u64, UserId>,
    tick: u64,
}

impl Inner {
    fn store(&mut self, user: &UserId, session: ConversationSession) {
        self.tick += 1;
        let tick = self.tick;
        let previous = self.entries.insert(
            user.clone(),
            Entry {
                session,
                last_seen: Instant::now(),
                tick,
            },
        );
        if let Some(previous) = previous {
            self.recency.remove(&previous.tick);
        }
        self.recency.insert(tick, user.clone());
    }

    fn trim_to(&mut self, capacity: usize) -> usize {
        let mut removed = 0;
        while self.entries.len() > capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(user = %oldest, "evicted least recently used session");
            removed += 1;
        }
        removed
    }

    fn expire_idle(&mut self, max_idle: Duration) -> usize {
        let mut removed = 0;
        while let Some((_, oldest)) = self.recency.first_key_value() {
            let expired = self
                .entries
                .get(oldest)
                .is_none_or(|entry| entry.last_seen.elapsed() > max_idle);
            if !expired {
                break;
            }
            if let Some((_, user)) = self.recency.pop_first() {
                self.entries.remove(&user);
            }
            removed += 1;
        }
        if removed > 0 {
            debug!(removed, "evicted idle sessions");
        }
        removed
    }
}

/// Keyed, thread-safe store of conversation sessions.
///
/// The lock is only held for the duration of a single call, never across an
/// await point, so users are processed independently. Recency is kept in an
/// ordered index, so eviction only ever looks at the oldest sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    policy: EvictionPolicy,
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            policy,
            inner: Mutex::default(),
        }
    }

    pub const fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the user's session, creating an `Idle` one on first contact.
    pub fn get(&self, user: &UserId) -> ConversationSession {
        let mut inner = self.lock();
        let session = inner.entries.get(user).map_or_else(
            || ConversationSession::new(user.clone()),
            |entry| entry.session.clone(),
        );
        inner.store(user, session.clone());
        self.enforce_capacity(&mut inner);
        session
    }

    /// Replaces the user's session.
    pub fn set(&self, user: &UserId, session: ConversationSession) {
        let mut inner = self.lock();
        inner.store(user, session);
        self.enforce_capacity(&mut inner);
    }

    /// Applies the eviction policy and returns how many sessions were dropped.
    ///
    /// Cheap when nothing is due: it stops at the first session that is kept.
    pub fn evict(&self) -> usize {
        let mut inner = self.lock();
        match self.policy {
            EvictionPolicy::Unbounded => 0,
            EvictionPolicy::LeastRecentlyUsed { capacity } => inner.trim_to(capacity.get()),
            EvictionPolicy::IdleFor(max_idle) => inner.expire_idle(max_idle),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn enforce_capacity(&self, inner: &mut Inner) {
        if let EvictionPolicy::LeastRecentlyUsed { capacity } = self.policy {
            inner.trim_to(capacity.get());
        }
    }
}
