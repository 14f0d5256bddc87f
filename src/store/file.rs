//! File-backed repository.
//!
//! An in-memory copy of the collection serves reads. Every write builds the
//! next version of the collection, saves it through the gateway, and only
//! then publishes it in memory. A failed save leaves both the file and the
//! in-memory view on the previous version.

use std::path::{Path, PathBuf};

use im::HashMap as ImHashMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::gateway::{self, StoreFormat};
use super::memory::{sorted_values, MemoryRepository};
use super::{Keyed, Repository};
use crate::error::StoreError;

/// Repository persisted as one collection file.
#[derive(Debug)]
pub struct FileRepository<T: Keyed + Clone> {
    path: PathBuf,
    format: StoreFormat,
    cache: MemoryRepository<T>,

    /// Serializes writers so each save starts from the latest version.
    write_lock: Mutex<()>,
}

impl<T> FileRepository<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned,
{
    /// Open a collection file.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged
    /// and also treated as empty; the next save overwrites it.
    pub fn open(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
        let path = path.into();
        let records = match gateway::load_all::<T>(&path, format) {
            Ok(records) => {
                tracing::info!("Loaded {} records from {:?}", records.len(), path);
                records
            }
            Err(e) => {
                tracing::warn!("Failed to load {:?}, starting empty: {}", path, e);
                Default::default()
            }
        };

        Self {
            path,
            format,
            cache: MemoryRepository::with_records(records.into_values()),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// Save a new version of the collection, then publish it.
    fn commit(
        &self,
        update: impl FnOnce(&mut ImHashMap<T::Key, T>),
    ) -> Result<(), StoreError> {
        let _writer = self.write_lock.lock();
        let mut next = self.cache.snapshot();
        update(&mut next);

        gateway::save_all(&self.path, self.format, &sorted_values(&next))?;
        self.cache.replace(next);
        Ok(())
    }
}

impl<T> Repository<T> for FileRepository<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    fn get(&self, key: &T::Key) -> Option<T> {
        self.cache.get(key)
    }

    fn put(&self, value: T) -> Result<(), StoreError> {
        self.commit(|records| {
            records.insert(value.key(), value);
        })
    }

    fn put_all(&self, values: Vec<T>) -> Result<(), StoreError> {
        self.commit(|records| {
            for value in values {
                records.insert(value.key(), value);
            }
        })
    }

    fn remove(&self, key: &T::Key) -> Result<Option<T>, StoreError> {
        let mut removed = None;
        self.commit(|records| {
            removed = records.remove(key);
        })?;
        Ok(removed)
    }

    fn list_all(&self) -> Vec<T> {
        self.cache.list_all()
    }
}
