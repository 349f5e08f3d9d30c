use crate::config::{default_facing, default_frame_height, default_frame_width};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snapbook_core::FacingMode;

/// Where frames come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraSource {
    /// Synthetic test pattern.
    #[default]
    Pattern,
    /// A still image file served as a camera.
    StillImage,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Frame source.
    #[serde(default)]
    pub source: CameraSource,

    /// Image served by the `still-image` source.
    #[serde(default)]
    pub image_path: Option<PathBuf>,

    /// Pattern frame width in pixels.
    #[serde(default = "default_frame_width")]
    pub width: u32,

    /// Pattern frame height in pixels.
    #[serde(default = "default_frame_height")]
    pub height: u32,

    /// Preferred facing when the platform offers a choice.
    #[serde(default = "default_facing")]
    pub facing: FacingMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: CameraSource::default(),
            image_path: None,
            width: default_frame_width(),
            height: default_frame_height(),
            facing: default_facing(),
        }
    }
}
