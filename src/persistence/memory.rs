//! In-process backend for tests and throwaway instances.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageBackend, StoreError};
use crate::domain::Dataset;

/// Keeps the document in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: RwLock<Option<Dataset>>,
    writes: AtomicUsize,
}

impl MemoryBackend {
    /// Creates a backend with no stored document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `dataset`.
    #[must_use]
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            document: RwLock::new(Some(dataset)),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> Result<Option<Dataset>, StoreError> {
        Ok(self.document.read().await.clone())
    }

    async fn write(&self, dataset: &Dataset) -> Result<(), StoreError> {
        *self.document.write().await = Some(dataset.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
