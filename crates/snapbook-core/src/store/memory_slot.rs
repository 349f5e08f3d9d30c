use crate::{
    CoreError, CoreResult,
    store::{PersistentSlot, slot::entry_size},
};

use std::{collections::HashMap, panic::Location, sync::Mutex};

use error_location::ErrorLocation;
use tracing::{debug, error};

/// In-memory slot store with an optional capacity ceiling.
///
/// Nothing survives the process; used for ephemeral sessions and as the
/// test double for [`FileSlot`](crate::FileSlot).
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl MemorySlot {
    /// Unbounded in-memory slot store.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory slot store that rejects writes past `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    /// Write a raw value without the capacity check (seeding fixtures).
    pub fn seed(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // The map stays consistent across a panicking holder: every write is a
        // single insert/remove.
        self.entries.lock().unwrap_or_else(|e| {
            error!("Slot map lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl PersistentSlot for MemorySlot {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    #[track_caller]
    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.lock();

        if let Some(capacity) = self.capacity {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let required = others + entry_size(key, value);

            if required > capacity {
                return Err(CoreError::StorageQuotaExceeded {
                    required,
                    capacity,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        debug!(key, bytes = value.len(), "Memory slot written");

        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}
