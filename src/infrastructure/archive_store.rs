// src/infrastructure/archive_store.rs
//
// Archive Store
//
// Writes a downloaded archive under its fixed suggested name.
// An existing file with the same name is replaced.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ArchiveStore {
    file_name: String,
}

impl ArchiveStore {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Save `archive` into `directory`, creating the directory if needed
    pub async fn save(&self, directory: &Path, archive: &[u8]) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(directory).await.map_err(|e| {
            AppError::Other(format!("Cannot create {}: {}", directory.display(), e))
        })?;

        let path = directory.join(&self.file_name);
        tokio::fs::write(&path, archive).await?;

        log::info!("Saved {} bytes to {}", archive.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_uses_suggested_name() {
        let dir = TempDir::new().unwrap();
        let store = ArchiveStore::new("compressed_images.zip");

        let path = store.save(dir.path(), b"PK\x03\x04").await.unwrap();

        assert_eq!(path, dir.path().join("compressed_images.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04");
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out").join("zips");
        let store = ArchiveStore::new("compressed_images.zip");

        store.save(&target, b"first").await.unwrap();
        let path = store.save(&target, b"second").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }
}
