//! Pipeline error types
//!
//! Every failure aborts the run. The CLI logs the error once and exits
//! non-zero; nothing is retried or recovered locally.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Errors that can occur while running the upload pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be read, decoded or validated
    #[error("error reading app config: {0}")]
    Config(#[from] ConfigError),

    /// The payload could not be written to the local file
    #[error("failed to write local file {}: {source}", .path.display())]
    LocalFileWrite {
        /// Local file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The local file could not be opened for upload
    #[error("failed to open local file {}: {source}", .path.display())]
    LocalFileOpen {
        /// Local file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The storage backend did not accept the object
    #[error("failed to upload to bucket `{bucket}` as `{key}`: {source}")]
    Upload {
        /// Target bucket
        bucket: String,
        /// Remote key
        key: String,
        /// Backend error
        source: StorageError,
    },

    /// The object was uploaded but the local file could not be removed
    #[error(
        "uploaded `{remote_key}` but failed to delete local file {}: {source}",
        .path.display()
    )]
    LocalFileDelete {
        /// Local file path
        path: PathBuf,
        /// Remote key that was written
        remote_key: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Whether the remote object was written before the failure
    #[must_use]
    pub const fn upload_succeeded(&self) -> bool {
        matches!(self, Self::LocalFileDelete { .. })
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_delete_failure_reports_successful_upload() {
        let err = PipelineError::LocalFileDelete {
            path: PathBuf::from("/tmp/out.txt"),
            remote_key: "/backups/out.txt".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert!(err.upload_succeeded());
        assert!(err.to_string().starts_with("uploaded `/backups/out.txt`"));
    }

    #[test]
    fn test_upload_failure_does_not_report_success() {
        let err = PipelineError::Upload {
            bucket: "reports".to_string(),
            key: "/backups/out.txt".to_string(),
            source: StorageError::upload("AccessDenied"),
        };

        assert!(!err.upload_succeeded());
        assert_eq!(
            err.to_string(),
            "failed to upload to bucket `reports` as `/backups/out.txt`: PutObject failed: AccessDenied"
        );
    }
}
