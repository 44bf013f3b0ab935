// psqlsync/src/storage/mod.rs
pub mod artifact;

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{AppConfig, StorageEngine};
use crate::errors::{Result, SyncError};

/// The flat directory holding compressed backup artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Builds the storage backend selected in the configuration.
    pub fn from_config(app_config: &AppConfig) -> Result<Self> {
        match app_config.engine()? {
            StorageEngine::Local => Ok(Self::new(&app_config.local_storage_path)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all artifacts, in the order the directory walk yields them.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(SyncError::StorageNotFound(self.root.clone()));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Copies a stored artifact to `destination`.
    pub fn fetch(&self, name: &str, destination: &Path) -> Result<PathBuf> {
        let source = self.root.join(name);
        fs::copy(&source, destination)?;
        Ok(destination.to_path_buf())
    }

    /// Moves `file` into storage as `name`, creating the directory when absent.
    pub fn store(&self, file: &Path, name: &str) -> Result<PathBuf> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        let destination = self.root.join(name);
        if fs::rename(file, &destination).is_err() {
            // Across filesystems rename fails; fall back to copy and remove.
            fs::copy(file, &destination)?;
            fs::remove_file(file)?;
        }
        Ok(destination)
    }
}
