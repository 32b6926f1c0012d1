mod file_storage;
mod memory_storage;
mod storage_error;

pub use file_storage::*;
pub use memory_storage::*;
pub use storage_error::*;

use std::sync::Arc;

use eyre::Result;

/// Client-local key/value storage for the player snapshot.
pub trait StateStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: StateStorage + ?Sized> StateStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
