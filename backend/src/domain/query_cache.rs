//! Per-owner read cache with a freshness window.
//!
//! Entries are keyed by entity kind and owner. A read within the freshness
//! window returns the stored value; anything older is reported as a miss and
//! the caller refetches. Mutations call [`QueryCache::invalidate`] so the next
//! read goes back to storage.
//!
//! Invalidation also bumps a per-key [`Generation`]. A reader captures the
//! generation before fetching and hands it back to [`QueryCache::put`]; a
//! fetch that raced with a mutation is discarded instead of cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use super::UserId;

/// Default freshness window for cached reads.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Entity families that can be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Notes,
}

type Key = (EntityKind, UserId);

/// Invalidation counter observed by a reader before it fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generation(u64);

struct Entry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

struct Slots<T> {
    entries: HashMap<Key, Entry<T>>,
    generations: HashMap<Key, Generation>,
}

/// Keyed cache of `(EntityKind, UserId) -> T`.
pub struct QueryCache<T> {
    slots: Mutex<Slots<T>>,
    freshness: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> QueryCache<T> {
    /// Create a cache with the given freshness window.
    ///
    /// Windows too large for `chrono` saturate to the maximum delta.
    pub fn new(freshness: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                generations: HashMap::new(),
            }),
            freshness: TimeDelta::from_std(freshness).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Return the cached value while it is still fresh.
    pub fn get(&self, kind: EntityKind, owner: &UserId) -> Option<T> {
        let now = self.clock.utc();
        let slots = self.lock();
        let entry = slots.entries.get(&(kind, owner.clone()))?;
        (now - entry.fetched_at < self.freshness).then(|| entry.value.clone())
    }

    /// Current generation for the key; capture it before fetching.
    pub fn generation(&self, kind: EntityKind, owner: &UserId) -> Generation {
        self.lock()
            .generations
            .get(&(kind, owner.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Store `value` as fetched now, unless the key was invalidated after
    /// `observed` was captured. Returns whether the value was stored.
    pub fn put(&self, kind: EntityKind, owner: &UserId, value: T, observed: Generation) -> bool {
        let fetched_at = self.clock.utc();
        let key = (kind, owner.clone());
        let mut slots = self.lock();
        let current = slots.generations.get(&key).copied().unwrap_or_default();
        if current != observed {
            return false;
        }
        slots.entries.insert(key, Entry { value, fetched_at });
        true
    }

    /// Drop the entry and bump its generation so the next read refetches
    /// and in-flight reads are not cached.
    pub fn invalidate(&self, kind: EntityKind, owner: &UserId) {
        let key = (kind, owner.clone());
        let mut slots = self.lock();
        slots.entries.remove(&key);
        let generation = slots.generations.entry(key).or_default();
        *generation = Generation(generation.0.wrapping_add(1));
    }
}
