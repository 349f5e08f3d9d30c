use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Download destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for downloaded photos (None = the user's Downloads folder).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}
