use crate::{
    CoreError, GalleryController, GalleryView, MemorySlot, PHOTO_SLOT_KEY, PersistentSlot, PhotoId,
    PhotoStore, SlotPhotoStore,
};

use std::sync::Arc;

use crate::tests::support::record;

fn store_with(ids: &[PhotoId]) -> Arc<SlotPhotoStore<MemorySlot>> {
    let store = Arc::new(SlotPhotoStore::new(MemorySlot::new()));
    for &id in ids {
        store.append(record(id)).unwrap();
    }
    store
}

/// WHAT: Scenario - empty store renders the empty state
/// WHY: First visit to the gallery shows a hint instead of a grid
#[test]
fn given_empty_store_when_mounting_gallery_then_empty_view() {
    // Given: An empty store
    let store = store_with(&[]);

    // When: Mounting the gallery
    let gallery = GalleryController::mount(store);

    // Then: Empty view
    assert_eq!(gallery.view(), GalleryView::Empty);
}

/// WHAT: Scenario - one stored photo renders a single tile labelled "1"
/// WHY: Tiles carry 1-based positions
#[test]
fn given_one_photo_when_mounting_gallery_then_one_tile_labelled_1() {
    // Given: One stored photo
    let store = store_with(&[1_700_000_000_000]);

    // When: Mounting
    let gallery = GalleryController::mount(store);

    // Then: One tile, position "1", timestamp shown
    let GalleryView::Grid { count_label, tiles } = gallery.view() else {
        panic!("expected a grid");
    };
    assert_eq!(count_label, "1 photo");
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].position, "1");
    assert_eq!(tiles[0].id, 1_700_000_000_000);
    assert_eq!(tiles[0].captured_at, "01/01/2024 10:00:00");
}

/// WHAT: delete_one updates the view and the store identically
/// WHY: No partial success visible to the user
#[test]
fn given_three_photos_when_deleting_middle_then_view_and_store_agree() {
    // Given: Three stored photos
    let store = store_with(&[1, 2, 3]);
    let mut gallery = GalleryController::mount(store.clone());

    // When: Deleting the middle one
    gallery.delete_one(2).unwrap();

    // Then: Both hold 1 and 3, positions renumbered
    assert_eq!(gallery.photos(), &store.load());
    let GalleryView::Grid { tiles, .. } = gallery.view() else {
        panic!("expected a grid");
    };
    let labels: Vec<(&str, PhotoId)> = tiles.iter().map(|t| (t.position.as_str(), t.id)).collect();
    assert_eq!(labels, vec![("1", 1), ("2", 3)]);
}

/// WHAT: Deleting the last photo switches to the empty state
/// WHY: Empty state applies after deletions too
#[test]
fn given_one_photo_when_deleting_it_then_empty_view() {
    // Given: One stored photo
    let store = store_with(&[10]);
    let mut gallery = GalleryController::mount(store.clone());

    // When: Deleting it
    gallery.delete_one(10).unwrap();

    // Then: Empty view and empty store
    assert!(gallery.view().is_empty());
    assert!(store.load().is_empty());
}

/// WHAT: Scenario - delete_all clears view and store
/// WHY: "Clear all" action
#[test]
fn given_three_photos_when_deleting_all_then_empty_view_and_store() {
    // Given: Three stored photos
    let store = store_with(&[1, 2, 3]);
    let mut gallery = GalleryController::mount(store.clone());

    // When: Deleting all
    gallery.delete_all().unwrap();

    // Then: Empty everywhere, slot removed
    assert_eq!(gallery.view(), GalleryView::Empty);
    assert!(store.load().is_empty());
    assert!(store.slot().get(PHOTO_SLOT_KEY).unwrap().is_none());
}

/// WHAT: The gallery does not see writes made after mounting until reload
/// WHY: No live updates between store writers and open readers
#[test]
fn given_mounted_gallery_when_store_written_elsewhere_then_stale_until_reload() {
    // Given: A gallery mounted on one photo
    let store = store_with(&[1]);
    let mut gallery = GalleryController::mount(store.clone());

    // When: Another writer appends
    store.append(record(2)).unwrap();

    // Then: Stale view until reload
    assert_eq!(gallery.photos().len(), 1);
    gallery.reload();
    assert_eq!(gallery.photos().len(), 2);
}

/// WHAT: A failed store write leaves the view untouched
/// WHY: Local state only changes after the store accepted the mutation
#[test]
fn given_store_rejecting_writes_when_deleting_then_error_and_view_unchanged() {
    // Given: Two photos seeded into a slot too small for any rewrite
    let slot = MemorySlot::with_capacity(1);
    let seeded = serde_json::to_string(&vec![record(1), record(2)]).unwrap();
    slot.seed(PHOTO_SLOT_KEY, &seeded);
    let store = Arc::new(SlotPhotoStore::new(slot));
    let mut gallery = GalleryController::mount(store.clone());

    // When: Deleting one
    let result = gallery.delete_one(1);

    // Then: Quota error, both photos still shown and stored
    assert!(matches!(result, Err(CoreError::StorageQuotaExceeded { .. })));
    assert_eq!(gallery.photos().len(), 2);
    assert_eq!(store.load().len(), 2);
}
