//! File storage collaborator
//!
//! Thin wrapper over the upload directory. The core only ever removes files
//! (cover-image cleanup on event deletion); upload plumbing lives at the
//! boundary. Injected into [`crate::services::EventService`] so tests can
//! point it at a temporary directory.

use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct FileStorage {
    upload_dir: PathBuf,
}

impl FileStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
        }
    }

    /// Absolute path of a stored file
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Remove a stored file from disk
    pub async fn remove(&self, filename: &str) -> Result<()> {
        tokio::fs::remove_file(self.path_for(filename)).await?;
        Ok(())
    }
}
