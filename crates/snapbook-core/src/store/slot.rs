use crate::CoreResult;

/// Browser local-storage sized default ceiling (5 MiB).
pub const DEFAULT_SLOT_CAPACITY: usize = 5 * 1024 * 1024;

/// Durable, synchronous, process-local string key-value store.
///
/// Writes are all-or-nothing: `set` either fully replaces the value under
/// `key` or fails and leaves the previous value readable.
pub trait PersistentSlot: Send + Sync {
    /// Read the value under `key`, `None` when absent.
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageQuotaExceeded` when the write would cross the
    /// capacity ceiling, `StorageError` on I/O failure.
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Delete `key`. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> CoreResult<()>;
}

impl<T: PersistentSlot + ?Sized> PersistentSlot for std::sync::Arc<T> {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        (**self).remove(key)
    }
}

/// Bytes a key/value pair counts against the capacity ceiling.
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
