use crate::{
    CoreError, CoreResult,
    photo::{PhotoCollection, PhotoId, PhotoRecord},
    store::PersistentSlot,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Fixed slot key holding the serialized photo collection.
pub const PHOTO_SLOT_KEY: &str = "capturedPhotos";

/// Durable ordered photo collection shared by the capture and gallery screens.
///
/// Last write wins. There is no locking and no version token: two writers
/// open at once (e.g. two capture windows) can silently lose each other's
/// appends. The application runs a single writer per store.
pub trait PhotoStore: Send + Sync {
    /// Current collection. Missing or unreadable data yields an empty one.
    fn load(&self) -> PhotoCollection;

    /// Push `record` to the end of the collection.
    fn append(&self, record: PhotoRecord) -> CoreResult<()>;

    /// Drop every record whose id equals `id`.
    fn remove(&self, id: PhotoId) -> CoreResult<()>;

    /// Delete the whole collection. Idempotent.
    fn clear(&self) -> CoreResult<()>;
}

impl<T: PhotoStore + ?Sized> PhotoStore for std::sync::Arc<T> {
    fn load(&self) -> PhotoCollection {
        (**self).load()
    }

    fn append(&self, record: PhotoRecord) -> CoreResult<()> {
        (**self).append(record)
    }

    fn remove(&self, id: PhotoId) -> CoreResult<()> {
        (**self).remove(id)
    }

    fn clear(&self) -> CoreResult<()> {
        (**self).clear()
    }
}

/// [`PhotoStore`] kept as one JSON array under [`PHOTO_SLOT_KEY`].
///
/// Every mutation is load / pure transform / store of the full collection
/// (see [`SlotPhotoStore::mutate`]).
#[derive(Debug)]
pub struct SlotPhotoStore<S> {
    slot: S,
}

impl<S: PersistentSlot> SlotPhotoStore<S> {
    /// Store backed by `slot`.
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Underlying slot backend.
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the full collection, apply `transform`, store the result.
    ///
    /// # Errors
    ///
    /// Fails without writing when the slot cannot be read, and when the
    /// write is rejected (e.g. `StorageQuotaExceeded`).
    #[track_caller]
    pub fn mutate<F>(&self, transform: F) -> CoreResult<PhotoCollection>
    where
        F: FnOnce(PhotoCollection) -> PhotoCollection,
    {
        let next = transform(self.read()?);
        self.store(&next)?;
        Ok(next)
    }

    /// Current collection for a read-modify-write cycle.
    ///
    /// A missing or unparseable slot reads as empty, but a failed slot read
    /// is returned as an error so the caller never writes a collection built
    /// from nothing over data it could not see.
    #[track_caller]
    fn read(&self) -> CoreResult<PhotoCollection> {
        let Some(raw) = self.slot.get(PHOTO_SLOT_KEY)? else {
            return Ok(PhotoCollection::new());
        };

        Ok(parse_collection(&raw))
    }

    #[track_caller]
    fn store(&self, collection: &PhotoCollection) -> CoreResult<()> {
        let serialized =
            serde_json::to_string(collection).map_err(|e| CoreError::SerializationFailed {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.slot.set(PHOTO_SLOT_KEY, &serialized)?;

        debug!(
            photo_count = collection.len(),
            bytes = serialized.len(),
            "Photo collection stored"
        );

        Ok(())
    }
}

impl<S: PersistentSlot> PhotoStore for SlotPhotoStore<S> {
    #[instrument(skip(self))]
    fn load(&self) -> PhotoCollection {
        let raw = match self.slot.get(PHOTO_SLOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PhotoCollection::new(),
            Err(e) => {
                warn!(error = ?e, "Photo slot unreadable, treating as empty");
                return PhotoCollection::new();
            }
        };

        parse_collection(&raw)
    }

    #[track_caller]
    #[instrument(skip(self, record), fields(id = record.id))]
    fn append(&self, record: PhotoRecord) -> CoreResult<()> {
        let stored = self.mutate(|collection| collection.with_appended(record))?;
        info!(photo_count = stored.len(), "Photo saved");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn remove(&self, id: PhotoId) -> CoreResult<()> {
        let stored = self.mutate(|collection| collection.without(id))?;
        info!(id, photo_count = stored.len(), "Photo removed");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn clear(&self) -> CoreResult<()> {
        self.slot.remove(PHOTO_SLOT_KEY)?;
        info!("Photo collection cleared");
        Ok(())
    }
}

/// Decode a stored collection. Corrupt data reads as empty and is replaced by
/// the next successful write.
fn parse_collection(raw: &str) -> PhotoCollection {
    match serde_json::from_str::<PhotoCollection>(raw) {
        Ok(collection) => collection,
        Err(e) => {
            warn!(error = %e, bytes = raw.len(), "Photo slot corrupt, treating as empty");
            PhotoCollection::new()
        }
    }
}
