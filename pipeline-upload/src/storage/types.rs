//! Core types for object storage

use std::time::Duration;
use thiserror::Error;

/// Errors reported by an object storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The upload body could not be prepared from the local file
    #[error("failed to read upload body: {0}")]
    Body(String),

    /// The backend rejected or failed the put (transport, auth, permissions)
    #[error("PutObject failed: {0}")]
    Upload(String),

    /// The put did not finish within the configured timeout
    #[error("PutObject timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl StorageError {
    /// Create an upload error from a string message
    #[must_use]
    pub fn upload<T: Into<String>>(msg: T) -> Self {
        Self::Upload(msg.into())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Confirmation of a successful object put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    /// Bucket the object was written to
    pub bucket: String,

    /// Object key as stored by the backend
    pub key: String,

    /// Human-readable location descriptor (`s3://bucket/key`)
    pub location: String,

    /// Entity tag returned by the backend, if any
    pub e_tag: Option<String>,

    /// Object version, when the bucket is versioned
    pub version_id: Option<String>,
}

impl PutReceipt {
    /// Receipt for `key` in `bucket` with no backend metadata
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let key = key.into();
        Self {
            location: location(&bucket, &key),
            bucket,
            key,
            e_tag: None,
            version_id: None,
        }
    }

    /// Attach the entity tag
    #[must_use]
    pub fn with_e_tag(mut self, e_tag: Option<&str>) -> Self {
        self.e_tag = e_tag.map(str::to_string);
        self
    }

    /// Attach the object version
    #[must_use]
    pub fn with_version_id(mut self, version_id: Option<&str>) -> Self {
        self.version_id = version_id.map(str::to_string);
        self
    }
}

/// Location descriptor for an object
///
/// ```rust
/// use pipeline_upload::storage::location;
///
/// assert_eq!(location("reports", "/backups/out.txt"), "s3://reports/backups/out.txt");
/// ```
#[must_use]
pub fn location(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{}", key.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_location() {
        let receipt = PutReceipt::new("reports", "backups/out.txt")
            .with_e_tag(Some("\"abc123\""))
            .with_version_id(None);

        assert_eq!(receipt.location, "s3://reports/backups/out.txt");
        assert_eq!(receipt.e_tag.as_deref(), Some("\"abc123\""));
        assert_eq!(receipt.version_id, None);
    }

    #[test]
    fn test_timeout_message() {
        let err = StorageError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "PutObject timed out after 30s");
    }
}
