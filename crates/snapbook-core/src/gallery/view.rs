use crate::photo::{PhotoCollection, PhotoId};

/// One grid entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// 1-based position label, e.g. `"1"`.
    pub position: String,
    /// Removal key for the tile's delete action.
    pub id: PhotoId,
    /// Capture time as stored.
    pub captured_at: String,
    /// PNG data URI to display.
    pub image_data: String,
}

/// What the gallery screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    /// No photos: show the empty-state hint instead of a grid.
    Empty,
    /// Header with the photo count and one tile per photo, in stored order.
    Grid {
        /// `"1 photo"` or `"<n> photos"`.
        count_label: String,
        /// One tile per photo.
        tiles: Vec<Tile>,
    },
}

impl GalleryView {
    /// Heading of the empty state.
    pub const EMPTY_TITLE: &'static str = "Empty gallery";
    /// Hint below the empty-state heading.
    pub const EMPTY_HINT: &'static str = "Take some photos with the camera to see them here!";

    /// Build the view for `photos`.
    pub fn of(photos: &PhotoCollection) -> Self {
        if photos.is_empty() {
            return GalleryView::Empty;
        }

        let tiles = photos
            .iter()
            .enumerate()
            .map(|(index, record)| Tile {
                position: (index + 1).to_string(),
                id: record.id,
                captured_at: record.captured_at.clone(),
                image_data: record.image_data.clone(),
            })
            .collect();

        GalleryView::Grid {
            count_label: count_label(photos.len()),
            tiles,
        }
    }

    /// Whether this is the empty state.
    pub fn is_empty(&self) -> bool {
        matches!(self, GalleryView::Empty)
    }
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 photo".to_string()
    } else {
        format!("{} photos", count)
    }
}
