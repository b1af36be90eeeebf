//! Object storage trait definitions

use async_trait::async_trait;
use tokio::fs::File;

use super::types::{PutReceipt, StorageResult};

/// Abstraction for object storage backends
///
/// The uploader only needs a single-object put. The file handle is moved
/// into the call, so it is closed once the put returns on every path.
///
/// # Examples
///
/// ```rust,no_run
/// use pipeline_upload::storage::{ObjectStore, S3ObjectStore};
/// use pipeline_upload::config::StorageConfig;
///
/// # async fn example(config: StorageConfig) -> anyhow::Result<()> {
/// let store = S3ObjectStore::from_config(&config).await;
///
/// let file = tokio::fs::File::open("/tmp/out.txt").await?;
/// let receipt = store.put_object("reports", "/backups/out.txt", file).await?;
/// println!("stored at {}", receipt.location);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write the full contents of `body` as the object `key` in `bucket`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The body cannot be read
    /// - The backend rejects the request (auth, permissions, missing bucket)
    /// - The transport fails or the put times out
    async fn put_object(&self, bucket: &str, key: &str, body: File) -> StorageResult<PutReceipt>;
}
