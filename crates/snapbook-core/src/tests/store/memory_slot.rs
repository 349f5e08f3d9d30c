use crate::{CoreError, MemorySlot, PersistentSlot};

/// WHAT: Values round-trip and removal of absent keys succeeds
/// WHY: Basic slot contract relied on by the photo store
#[test]
fn given_memory_slot_when_setting_and_removing_then_contract_holds() {
    // Given: An unbounded slot
    let slot = MemorySlot::new();

    // When: Setting, reading, removing twice
    slot.set("k", "v").unwrap();
    let read = slot.get("k").unwrap();
    slot.remove("k").unwrap();
    slot.remove("k").unwrap();

    // Then: Read saw the value, key is gone afterwards
    assert_eq!(read.as_deref(), Some("v"));
    assert_eq!(slot.get("k").unwrap(), None);
}

/// WHAT: Overwriting a key only counts the new value against capacity
/// WHY: Replacing a collection with a slightly larger one must not double count
#[test]
fn given_capacity_when_overwriting_key_then_old_value_not_counted() {
    // Given: Capacity of 10 bytes, key "k" holding 8 bytes
    let slot = MemorySlot::with_capacity(10);
    slot.set("k", "12345678").unwrap();

    // When: Overwriting with 9 bytes (1 + 9 = 10), then 10 bytes (11)
    let fits = slot.set("k", "123456789");
    let overflow = slot.set("k", "1234567890");

    // Then: First fits, second exceeds and leaves the 9-byte value
    assert!(fits.is_ok());
    assert!(matches!(
        overflow,
        Err(CoreError::StorageQuotaExceeded {
            required: 11,
            capacity: 10,
            ..
        })
    ));
    assert_eq!(slot.get("k").unwrap().as_deref(), Some("123456789"));
}
