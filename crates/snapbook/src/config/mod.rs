mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod display_config;
mod export_config;
mod storage_config;

pub(crate) use {
    camera_config::{CameraConfig, CameraSource},
    config::Config,
    display_config::DisplayConfig,
    export_config::ExportConfig,
    storage_config::StorageConfig,
};

use snapbook_core::{DEFAULT_SLOT_CAPACITY, DEFAULT_TIMESTAMP_FORMAT, FacingMode};

pub(crate) const DEFAULT_FRAME_WIDTH: u32 = 640;
pub(crate) const DEFAULT_FRAME_HEIGHT: u32 = 480;

pub(crate) fn default_frame_width() -> u32 {
    DEFAULT_FRAME_WIDTH
}

pub(crate) fn default_frame_height() -> u32 {
    DEFAULT_FRAME_HEIGHT
}

pub(crate) fn default_facing() -> FacingMode {
    FacingMode::Environment
}

pub(crate) fn default_capacity_bytes() -> usize {
    DEFAULT_SLOT_CAPACITY
}

pub(crate) fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
