mod controller;
mod view;

pub use {
    controller::GalleryController,
    view::{GalleryView, Tile},
};
