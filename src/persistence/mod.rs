//! Persistence layer: whole-document storage behind a pluggable backend.
//!
//! The tracker stores its entire [`Dataset`] as one JSON document. A
//! [`StorageBackend`] knows how to read and overwrite that document on
//! some medium (local file, Google Cloud Storage, process memory), and
//! [`Store`] layers the service's persistence policy on top:
//!
//! - plain reads never fail: any backend error degrades to the empty
//!   dataset;
//! - writes always report failure to the caller;
//! - mutations run as load → mutate → save under a single writer lock,
//!   and abort without saving when the stored document cannot be read.

pub mod file;
pub mod gcs;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::StorageConfig;
use crate::domain::Dataset;

pub use file::FileBackend;
pub use gcs::GcsBackend;
pub use memory::MemoryBackend;

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Local filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not a valid dataset, or could not be encoded.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failure talking to the object store.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The object store answered with an unexpected status.
    #[error("object store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The configured object store endpoint is not a usable base URL.
    #[error("invalid object store endpoint: {0}")]
    InvalidEndpoint(String),

    /// A blocking write task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Medium that holds the persisted dataset document.
///
/// Implementations only move bytes; the degrade-on-read policy lives in
/// [`Store`].
#[async_trait]
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Reads the stored document. `Ok(None)` means nothing has been
    /// written yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the medium cannot be read or the
    /// document cannot be decoded.
    async fn read(&self) -> Result<Option<Dataset>, StoreError>;

    /// Replaces the stored document with `dataset`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the document could not be written.
    async fn write(&self, dataset: &Dataset) -> Result<(), StoreError>;
}

/// Builds the backend selected by configuration.
#[must_use]
pub fn backend_from_config(config: &StorageConfig) -> Arc<dyn StorageBackend> {
    match config {
        StorageConfig::Local { path } => Arc::new(FileBackend::new(path.clone())),
        StorageConfig::Gcs(gcs) => Arc::new(GcsBackend::new(gcs.clone())),
        StorageConfig::Memory => Arc::new(MemoryBackend::new()),
    }
}

/// Dataset store with the service's read/write policy.
#[derive(Debug)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
    write_lock: Mutex<()>,
}

impl Store {
    /// Wraps a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store for the backend selected by `config`.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(backend_from_config(config))
    }

    /// Name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Loads the dataset, substituting the empty dataset when nothing is
    /// stored yet or the backend fails.
    pub async fn load(&self) -> Dataset {
        match self.backend.read().await {
            Ok(Some(dataset)) => dataset,
            Ok(None) => Dataset::default(),
            Err(e) => {
                tracing::error!(backend = self.backend.name(), error = %e, "failed to load dataset");
                Dataset::default()
            }
        }
    }

    /// Loads the dataset a mutation will write back.
    ///
    /// Unlike [`Store::load`], a backend failure is returned instead of
    /// degrading, so an unreadable document is never overwritten.
    async fn load_for_update(&self) -> Result<Dataset, StoreError> {
        match self.backend.read().await {
            Ok(dataset) => Ok(dataset.unwrap_or_default()),
            Err(e) => {
                tracing::error!(
                    backend = self.backend.name(),
                    error = %e,
                    "failed to load dataset for update, aborting"
                );
                Err(e)
            }
        }
    }

    /// Overwrites the stored dataset.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StoreError`] if the write failed.
    pub async fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.backend.write(dataset).await.inspect_err(|e| {
            tracing::error!(backend = self.backend.name(), error = %e, "failed to save dataset");
        })
    }

    /// Runs one load → mutate → save cycle.
    ///
    /// Only one cycle runs at a time. If `mutate` returns an error the
    /// dataset is not written back.
    ///
    /// # Errors
    ///
    /// Returns the read failure or the save failure converted into `E`, or
    /// the error produced by `mutate`.
    pub async fn update<T, E, F>(&self, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Dataset) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut dataset = self.load_for_update().await?;
        let value = mutate(&mut dataset)?;
        self.save(&dataset).await?;
        Ok(value)
    }
}
