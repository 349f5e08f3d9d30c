use crate::{
    CoreResult,
    gallery::GalleryView,
    photo::{PhotoCollection, PhotoId},
    store::PhotoStore,
};

use std::sync::Arc;

use tracing::{debug, info, instrument};

/// Drives one gallery screen.
///
/// Reads the store once on mount and keeps its own copy. Writes made by a
/// capture screen afterwards are not seen until [`reload`](Self::reload).
pub struct GalleryController {
    store: Arc<dyn PhotoStore>,
    photos: PhotoCollection,
}

impl GalleryController {
    /// Mount the gallery: load the collection once.
    #[instrument(skip(store))]
    pub fn mount(store: Arc<dyn PhotoStore>) -> Self {
        let photos = store.load();
        info!(photo_count = photos.len(), "Gallery mounted");
        Self { store, photos }
    }

    /// Re-read the store, replacing the local copy.
    pub fn reload(&mut self) {
        self.photos = self.store.load();
        debug!(photo_count = self.photos.len(), "Gallery reloaded");
    }

    /// Local copy of the stored photos.
    pub fn photos(&self) -> &PhotoCollection {
        &self.photos
    }

    /// Render model for the current photos.
    pub fn view(&self) -> GalleryView {
        GalleryView::of(&self.photos)
    }

    /// Delete one photo from the view and the store.
    ///
    /// Local state changes only after the store accepted the removal, so
    /// both sides always show the same set.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete_one(&mut self, id: PhotoId) -> CoreResult<()> {
        let next = self.photos.clone().without(id);
        self.store.remove(id)?;

        info!(
            id,
            removed = self.photos.len() - next.len(),
            remaining = next.len(),
            "Photo deleted"
        );
        self.photos = next;

        Ok(())
    }

    /// Delete every photo from the view and the store.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete_all(&mut self) -> CoreResult<()> {
        self.store.clear()?;

        info!(removed = self.photos.len(), "All photos deleted");
        self.photos = PhotoCollection::new();

        Ok(())
    }
}
