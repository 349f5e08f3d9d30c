mod file_slot;
mod memory_slot;
mod photo_store;
mod slot;

pub use {
    file_slot::FileSlot,
    memory_slot::MemorySlot,
    photo_store::{PHOTO_SLOT_KEY, PhotoStore, SlotPhotoStore},
    slot::{DEFAULT_SLOT_CAPACITY, PersistentSlot},
};
