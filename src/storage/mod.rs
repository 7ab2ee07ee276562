//! Key/value persistence used to keep search state across runs.

use crate::storage::errors::StorageResult;

pub mod errors;
pub mod file;
pub mod memory;
pub mod session;

pub use file::FileStore;
pub use memory::MemoryStore;

/// String key/value store with session-storage semantics.
pub trait PersistenceAdapter {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    /// Drops every key.
    fn clear(&self) -> StorageResult<()>;
}

impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}
