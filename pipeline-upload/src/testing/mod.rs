//! Testing utilities
//!
//! Provides an in-memory object store that records every put for assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::storage::{object_key, ObjectStore, PutReceipt, StorageError, StorageResult};

/// A put captured by [`RecordingObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPut {
    /// Target bucket
    pub bucket: String,
    /// Remote key as passed by the caller
    pub key: String,
    /// Full object body
    pub body: Vec<u8>,
}

/// In-memory object store for testing
///
/// Reads each body to the end and keeps it, so tests can check what would
/// have been uploaded. Can be switched into a failing mode to exercise the
/// error path.
///
/// # Examples
///
/// ```rust
/// use pipeline_upload::storage::ObjectStore;
/// use pipeline_upload::testing::RecordingObjectStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RecordingObjectStore::new();
///
/// let file = tokio::fs::File::open("Cargo.toml").await?;
/// store.put_object("reports", "/backups/Cargo.toml", file).await?;
///
/// assert_eq!(store.put_count(), 1);
/// assert!(store.was_put("/backups/Cargo.toml"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingObjectStore {
    puts: Arc<Mutex<Vec<RecordedPut>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingObjectStore {
    /// Create an empty store that accepts every put
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects every put with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let store = Self::default();
        store.fail_with(message);
        store
    }

    /// Reject subsequent puts with `message`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Accept subsequent puts again
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Number of accepted puts
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    /// All accepted puts, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    /// The most recent accepted put
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn last_put(&self) -> Option<RecordedPut> {
        self.puts.lock().unwrap().last().cloned()
    }

    /// Whether any accepted put used `key`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn was_put(&self, key: &str) -> bool {
        self.puts.lock().unwrap().iter().any(|put| put.key == key)
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, mut body: File) -> StorageResult<PutReceipt> {
        let failure = self.failure.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(StorageError::Upload(message));
        }

        let mut contents = Vec::new();
        body.read_to_end(&mut contents)
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?;

        self.puts.lock().unwrap().push(RecordedPut {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: contents,
        });

        Ok(PutReceipt::new(bucket, object_key(key)))
    }
}
