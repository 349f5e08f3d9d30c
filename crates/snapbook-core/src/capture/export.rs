use crate::{CoreError, CoreResult};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Client-side download of a byte blob under a generated filename.
pub trait FileExporter: Send + Sync {
    /// Hand `bytes` to the user as `filename`. Returns where it landed.
    fn export(&self, filename: &str, bytes: &[u8]) -> CoreResult<PathBuf>;
}

/// Writes downloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    /// Exporter writing into `dir`. The directory is created on first export.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileExporter for DirectoryExporter {
    #[track_caller]
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    fn export(&self, filename: &str, bytes: &[u8]) -> CoreResult<PathBuf> {
        let export_error = |reason: String| CoreError::ExportFailed {
            filename: filename.to_string(),
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| export_error(format!("Failed to create download dir: {}", e)))?;
        }

        let path = self.dir.join(filename);
        fs::write(&path, bytes).map_err(|e| export_error(format!("Failed to write file: {}", e)))?;

        info!(path = ?path, "Photo downloaded");

        Ok(path)
    }
}
