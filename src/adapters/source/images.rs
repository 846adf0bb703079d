//! Image stores
//!
//! Rich-text descriptions reference embedded images by an internal numeric id
//! plus the original file name. Image retrieval happens inside the blocking
//! export worker, so the store is synchronous.

use crate::domain::{Result, SourceError};
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves embedded image references to raw bytes
pub trait ImageStore: Send + Sync {
    /// Returns the bytes of image `image_id`, originally named `file_name`
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ImageNotFound`] when the image does not exist.
    fn fetch(&self, image_id: u32, file_name: &str) -> Result<Vec<u8>>;
}

/// Images stored as files in one directory
///
/// `{id}-{file_name}` is tried first, then `{file_name}`.
#[derive(Debug, Clone)]
pub struct DirectoryImageStore {
    dir: PathBuf,
}

impl DirectoryImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageStore for DirectoryImageStore {
    fn fetch(&self, image_id: u32, file_name: &str) -> Result<Vec<u8>> {
        let candidates = [
            self.dir.join(format!("{image_id}-{file_name}")),
            self.dir.join(file_name),
        ];
        for path in &candidates {
            if path.is_file() {
                return std::fs::read(path).map_err(|e| {
                    SourceError::Unavailable(format!("{}: {e}", path.display())).into()
                });
            }
        }
        Err(SourceError::ImageNotFound {
            id: image_id,
            file_name: file_name.to_string(),
        }
        .into())
    }
}

/// In-memory image store keyed by image id
#[derive(Debug, Clone, Default)]
pub struct InMemoryImageStore {
    images: HashMap<u32, Vec<u8>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image_id: u32, bytes: Vec<u8>) {
        self.images.insert(image_id, bytes);
    }

    pub fn with_image(mut self, image_id: u32, bytes: Vec<u8>) -> Self {
        self.insert(image_id, bytes);
        self
    }
}

impl ImageStore for InMemoryImageStore {
    fn fetch(&self, image_id: u32, file_name: &str) -> Result<Vec<u8>> {
        self.images.get(&image_id).cloned().ok_or_else(|| {
            SourceError::ImageNotFound {
                id: image_id,
                file_name: file_name.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReqportError;
    use tempfile::TempDir;

    #[test]
    fn test_directory_store_prefers_id_prefixed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("7-logo.png"), b"prefixed").unwrap();
        std::fs::write(dir.path().join("logo.png"), b"plain").unwrap();

        let store = DirectoryImageStore::new(dir.path());
        assert_eq!(store.fetch(7, "logo.png").unwrap(), b"prefixed");
        assert_eq!(store.fetch(8, "logo.png").unwrap(), b"plain");
    }

    #[test]
    fn test_directory_store_missing_image() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryImageStore::new(dir.path());
        let err = store.fetch(1, "missing.gif").unwrap_err();
        assert!(matches!(
            err,
            ReqportError::Source(SourceError::ImageNotFound { id: 1, .. })
        ));
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryImageStore::new().with_image(3, vec![1, 2, 3]);
        assert_eq!(store.fetch(3, "x.png").unwrap(), vec![1, 2, 3]);
        assert!(store.fetch(4, "y.png").is_err());
    }
}
