//! Persistence: keyed repositories over whole-collection files.
//!
//! ## Key Types
//!
//! - `Keyed`: Records that know their own key
//! - `Repository`: Keyed `get`/`put`/`list_all` storage injected into engines
//! - `MemoryRepository`: `im`-backed, for tests and ephemeral runs
//! - `FileRepository`: Memory cache plus atomic whole-file saves
//! - `KeyedLocks`: Per-key single-writer locking

pub mod file;
pub mod gateway;
pub mod locks;
pub mod memory;

use std::fmt::{Debug, Display};
use std::hash::Hash;

pub use file::FileRepository;
pub use gateway::StoreFormat;
pub use locks::KeyedLocks;
pub use memory::MemoryRepository;

use crate::error::StoreError;

/// A record with a stable primary key.
pub trait Keyed {
    type Key: Clone + Eq + Hash + Ord + Debug + Display + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// Keyed storage for one collection.
///
/// `put_all` writes every value as one unit: either all of them are stored
/// or none are.
pub trait Repository<T: Keyed>: Send + Sync {
    fn get(&self, key: &T::Key) -> Option<T>;

    fn put(&self, value: T) -> Result<(), StoreError>;

    fn put_all(&self, values: Vec<T>) -> Result<(), StoreError>;

    fn remove(&self, key: &T::Key) -> Result<Option<T>, StoreError>;

    /// Every record, ordered by key.
    fn list_all(&self) -> Vec<T>;
}
