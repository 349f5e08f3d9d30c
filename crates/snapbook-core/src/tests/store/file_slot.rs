use crate::{CoreError, FileSlot, PersistentSlot, PhotoStore, SlotPhotoStore};

use crate::tests::support::{record, scratch_dir};

/// WHAT: Slot directory is created on open and values persist across instances
/// WHY: The gallery must survive an application restart
#[test]
fn given_file_slot_when_reopening_then_value_persists() {
    // Given: A slot in a new directory with one value
    let dir = scratch_dir("file-slot");
    let slot = FileSlot::open(&dir).unwrap();
    slot.set("photos", "[1,2,3]").unwrap();

    // When: Opening a second instance on the same directory
    let reopened = FileSlot::open(&dir).unwrap();

    // Then: Value is visible and no temp file is left behind
    assert_eq!(reopened.get("photos").unwrap().as_deref(), Some("[1,2,3]"));
    assert!(!dir.join("photos.json.tmp").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

/// WHAT: Over-capacity write is rejected and previous value kept
/// WHY: Atomic all-or-nothing writes at the storage ceiling
#[test]
fn given_small_capacity_when_writing_large_value_then_quota_error_and_old_value_kept() {
    // Given: A 32 byte slot directory holding a short value
    let dir = scratch_dir("file-slot-quota");
    let slot = FileSlot::with_capacity(&dir, 32).unwrap();
    slot.set("photos", "[]").unwrap();

    // When: Writing 64 bytes
    let result = slot.set("photos", &"x".repeat(64));

    // Then: Quota error, old value intact
    assert!(matches!(result, Err(CoreError::StorageQuotaExceeded { .. })));
    assert_eq!(slot.get("photos").unwrap().as_deref(), Some("[]"));

    let _ = std::fs::remove_dir_all(&dir);
}

/// WHAT: Photo store on a file slot supports the full lifecycle
/// WHY: The application runs on FileSlot
#[test]
fn given_file_backed_store_when_append_remove_clear_then_load_reflects_each_step() {
    // Given: A file-backed photo store
    let dir = scratch_dir("file-store");
    let store = SlotPhotoStore::new(FileSlot::open(&dir).unwrap());

    // When/Then: append two, remove one, clear
    store.append(record(1)).unwrap();
    store.append(record(2)).unwrap();
    assert_eq!(store.load().len(), 2);

    store.remove(1).unwrap();
    let remaining: Vec<i64> = store.load().iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![2]);

    store.clear().unwrap();
    assert!(store.load().is_empty());
    store.clear().unwrap();

    let _ = std::fs::remove_dir_all(&dir);
}
