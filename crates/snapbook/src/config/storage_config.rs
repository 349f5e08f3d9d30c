use crate::config::default_capacity_bytes;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Photo storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the slot files (None = platform data dir).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Storage ceiling in bytes.
    #[serde(default = "default_capacity_bytes")]
    pub capacity_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            capacity_bytes: default_capacity_bytes(),
        }
    }
}
