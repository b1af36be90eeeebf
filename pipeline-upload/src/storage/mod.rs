//! Object storage abstraction and the S3 backend
//!
//! The `ObjectStore` trait is the seam between the upload flow and the
//! storage service. `S3ObjectStore` is the production backend; tests use
//! the mockall-generated `MockObjectStore` or
//! [`crate::testing::RecordingObjectStore`].
//!
//! # Keys
//!
//! Remote keys are derived with [`remote_key`] from the configured path
//! prefix and the local file name:
//!
//! ```rust
//! use pipeline_upload::storage::{object_key, remote_key};
//!
//! let key = remote_key("backups", "out.txt");
//! assert_eq!(key, "/backups/out.txt");
//! assert_eq!(object_key(&key), "backups/out.txt");
//! ```

mod key;
mod s3;
mod traits;
mod types;

pub use key::{object_key, remote_key, KEY_SEPARATOR};
pub use s3::{load_sdk_config, S3ObjectStore};
#[cfg(test)]
pub use traits::MockObjectStore;
pub use traits::ObjectStore;
pub use types::{location, PutReceipt, StorageError, StorageResult};
