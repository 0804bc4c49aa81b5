//! Local JSON file backend.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{StorageBackend, StoreError};
use crate::domain::Dataset;

/// Stores the dataset as a pretty-printed JSON file.
///
/// Writes go to a temporary file in the target's directory which is then
/// renamed over the target, so readers never observe a half-written
/// document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn read(&self) -> Result<Option<Dataset>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(dataset)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &content)).await??;
        tracing::debug!(path = %self.path.display(), "dataset written");
        Ok(())
    }
}

/// Atomically replaces `path` with `content`.
fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
