//! Single-file upload: open, put, delete, report

use std::path::Path;

use tokio::fs;

use crate::config::StorageConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::storage::{remote_key, ObjectStore};

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Remote key the file was uploaded under (rooted, e.g. `/backups/out.txt`)
    pub remote_key: String,

    /// Location descriptor reported by the store
    pub location: String,

    /// Entity tag returned by the store, if any
    pub e_tag: Option<String>,
}

/// Uploads local files to the configured bucket and prefix
///
/// # Examples
///
/// ```rust,no_run
/// use pipeline_upload::config::ConfigLoader;
/// use pipeline_upload::storage::S3ObjectStore;
/// use pipeline_upload::upload::Uploader;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = ConfigLoader::new().load()?;
/// let store = S3ObjectStore::from_config(&config.s3_config).await;
///
/// let report = Uploader::new(&config.s3_config, &store)
///     .upload_file(Path::new("/tmp"), "out.txt")
///     .await?;
/// assert_eq!(report.remote_key, format!("/{}/out.txt", config.s3_config.path_prefix));
/// # Ok(())
/// # }
/// ```
pub struct Uploader<'a, S: ObjectStore + ?Sized> {
    config: &'a StorageConfig,
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> Uploader<'a, S> {
    /// Create an uploader for one storage config and backend
    #[must_use]
    pub const fn new(config: &'a StorageConfig, store: &'a S) -> Self {
        Self { config, store }
    }

    /// Remote key a local file name maps to
    #[must_use]
    pub fn key_for(&self, file_name: &str) -> String {
        remote_key(&self.config.path_prefix, file_name)
    }

    /// Upload `local_dir/file_name`, then delete the local file
    ///
    /// The local file is removed only after the store confirms the put. If
    /// removal fails the error still reports the remote key, since the object
    /// has already been written.
    pub async fn upload_file(&self, local_dir: &Path, file_name: &str) -> PipelineResult<UploadReport> {
        let local_path = local_dir.join(file_name);
        let key = self.key_for(file_name);

        let file = fs::File::open(&local_path)
            .await
            .map_err(|source| PipelineError::LocalFileOpen {
                path: local_path.clone(),
                source,
            })?;

        tracing::info!(
            path = %local_path.display(),
            bucket = %self.config.bucket_name,
            key = %key,
            "Uploading local file"
        );

        // the handle is moved into the store and closed when the put returns
        let receipt = self
            .store
            .put_object(&self.config.bucket_name, &key, file)
            .await
            .map_err(|source| PipelineError::Upload {
                bucket: self.config.bucket_name.clone(),
                key: key.clone(),
                source,
            })?;

        fs::remove_file(&local_path)
            .await
            .map_err(|source| PipelineError::LocalFileDelete {
                path: local_path.clone(),
                remote_key: key.clone(),
                source,
            })?;

        tracing::info!(location = %receipt.location, "Successfully uploaded to {}", receipt.location);

        Ok(UploadReport {
            remote_key: key,
            location: receipt.location,
            e_tag: receipt.e_tag,
        })
    }
}
