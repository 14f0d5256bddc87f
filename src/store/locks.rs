//! Per-key mutual exclusion.
//!
//! Each aggregate is single-writer: all work on one player runs under that
//! player's lock. Operations touching several players take every lock in
//! ascending key order, with duplicates removed, so two operations can never
//! wait on each other in a cycle.
//!
//! Entries are created on first use and dropped again once no caller holds
//! or waits on them, so the table only grows with concurrent activity.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// A table of lazily created mutexes, one per key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    table: Mutex<FxHashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            table: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<K: Clone + Eq + Hash + Ord> KeyedLocks<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &K) -> Arc<Mutex<()>> {
        let mut table = self.table.lock();
        Arc::clone(table.entry(key.clone()).or_default())
    }

    /// Drop table entries no caller holds a handle to.
    fn release(&self, keys: &[K]) {
        let mut table = self.table.lock();
        for key in keys {
            if table.get(key).is_some_and(|m| Arc::strong_count(m) == 1) {
                table.remove(key);
            }
        }
    }

    /// Run `f` while holding the locks of every key in `keys`.
    pub fn with_locks<R>(&self, keys: impl IntoIterator<Item = K>, f: impl FnOnce() -> R) -> R {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let result = {
            let mutexes: Vec<Arc<Mutex<()>>> = keys.iter().map(|k| self.entry(k)).collect();
            hold(&mutexes, f)
        };
        self.release(&keys);
        result
    }

    /// Run `f` while holding one key's lock.
    pub fn with_lock<R>(&self, key: &K, f: impl FnOnce() -> R) -> R {
        let result = {
            let mutex = self.entry(key);
            let _guard = mutex.lock();
            f()
        };
        self.release(std::slice::from_ref(key));
        result
    }

    /// Number of keys currently held or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn hold<R>(mutexes: &[Arc<Mutex<()>>], f: impl FnOnce() -> R) -> R {
    match mutexes.split_first() {
        None => f(),
        Some((first, rest)) => {
            let _guard = first.lock();
            hold(rest, f)
        }
    }
}
