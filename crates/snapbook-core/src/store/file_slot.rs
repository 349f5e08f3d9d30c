//! Directory-backed persistent slots.
//!
//! Each key maps to one `<key>.json` file. Writes go to a temp file that is
//! synced and renamed over the target, so a crash mid-write leaves the old
//! value in place.

use crate::{
    CoreError, CoreResult,
    store::{DEFAULT_SLOT_CAPACITY, PersistentSlot, slot::entry_size},
};

use std::{
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

const SLOT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Persistent slots stored as files under one directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
    capacity: usize,
}

impl FileSlot {
    /// Open (creating if needed) a slot directory with the default ceiling.
    #[track_caller]
    pub fn open<P: AsRef<Path>>(dir: P) -> CoreResult<Self> {
        Self::with_capacity(dir, DEFAULT_SLOT_CAPACITY)
    }

    /// Open (creating if needed) a slot directory with a custom ceiling.
    #[track_caller]
    #[instrument(skip(dir))]
    pub fn with_capacity<P: AsRef<Path>>(dir: P, capacity: usize) -> CoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| CoreError::StorageError {
                reason: format!("Failed to create slot directory {:?}: {}", dir, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!(dir = ?dir, "Created slot directory");
        }

        info!(dir = ?dir, capacity, "File slot store opened");

        Ok(Self { dir, capacity })
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", sanitize_key(key), SLOT_EXTENSION))
    }

    /// Bytes held by every slot except `key`.
    #[track_caller]
    fn used_by_others(&self, key: &str) -> CoreResult<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CoreError::StorageError {
            reason: format!("Failed to list slot directory: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let own = self.slot_path(key);
        let mut used = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            if path == own || path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            let stem_len = path
                .file_stem()
                .map(|stem| stem.len())
                .unwrap_or_default();
            let value_len = entry.metadata().map(|m| m.len() as usize).unwrap_or_default();
            used += stem_len + value_len;
        }

        Ok(used)
    }
}

impl PersistentSlot for FileSlot {
    #[track_caller]
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::StorageError {
                reason: format!("Failed to read slot {}: {}", key, e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[track_caller]
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let required = self.used_by_others(key)? + entry_size(key, value);
        if required > self.capacity {
            return Err(CoreError::StorageQuotaExceeded {
                required,
                capacity: self.capacity,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let path = self.slot_path(key);
        let temp_path = path.with_extension(TEMP_EXTENSION);

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| CoreError::StorageError {
            reason: format!("Failed to create temp slot file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(value.as_bytes())
            .map_err(|e| CoreError::StorageError {
                reason: format!("Failed to write temp slot file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| CoreError::StorageError {
            reason: format!("Failed to sync temp slot file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &path).map_err(|e| CoreError::StorageError {
            reason: format!("Failed to rename temp slot to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(path = ?path, "Slot written (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn remove(&self, key: &str) -> CoreResult<()> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageError {
                reason: format!("Failed to remove slot {}: {}", key, e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Keys become file stems; anything outside `[A-Za-z0-9_-]` is replaced.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
