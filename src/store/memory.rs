//! In-memory repository.
//!
//! Records live in an `im::HashMap`, whose clones are O(1) structural
//! shares. `list_all` and batch writes work on a cheap snapshot, so readers
//! never hold the lock while iterating.

use im::HashMap as ImHashMap;
use parking_lot::RwLock;

use super::{Keyed, Repository};
use crate::error::StoreError;

/// Repository that never touches the disk.
#[derive(Debug)]
pub struct MemoryRepository<T: Keyed + Clone> {
    records: RwLock<ImHashMap<T::Key, T>>,
}

impl<T: Keyed + Clone> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(ImHashMap::new()),
        }
    }
}

impl<T: Keyed + Clone> MemoryRepository<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map: ImHashMap<T::Key, T> = records.into_iter().map(|r| (r.key(), r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    /// O(1) snapshot of the whole collection.
    #[must_use]
    pub fn snapshot(&self) -> ImHashMap<T::Key, T> {
        self.records.read().clone()
    }

    /// Replace the whole collection with `records`.
    pub(crate) fn replace(&self, records: ImHashMap<T::Key, T>) {
        *self.records.write() = records;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Sorted values of a snapshot, for stable listings and file output.
pub(crate) fn sorted_values<T: Keyed + Clone>(map: &ImHashMap<T::Key, T>) -> Vec<T> {
    let mut values: Vec<T> = map.values().cloned().collect();
    values.sort_by_key(Keyed::key);
    values
}

impl<T> Repository<T> for MemoryRepository<T>
where
    T: Keyed + Clone + Send + Sync,
{
    fn get(&self, key: &T::Key) -> Option<T> {
        self.records.read().get(key).cloned()
    }

    fn put(&self, value: T) -> Result<(), StoreError> {
        self.records.write().insert(value.key(), value);
        Ok(())
    }

    fn put_all(&self, values: Vec<T>) -> Result<(), StoreError> {
        let mut records = self.records.write();
        for value in values {
            records.insert(value.key(), value);
        }
        Ok(())
    }

    fn remove(&self, key: &T::Key) -> Result<Option<T>, StoreError> {
        Ok(self.records.write().remove(key))
    }

    fn list_all(&self) -> Vec<T> {
        sorted_values(&self.snapshot())
    }
}
