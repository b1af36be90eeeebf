//! One-shot run: write the payload locally, then upload it

use std::path::{Path, PathBuf};

use validator::Validate;

use crate::config::{AppConfig, ConfigError};
use crate::error::{PipelineError, PipelineResult};
use crate::storage::ObjectStore;
use crate::upload::{UploadReport, Uploader};

/// Directory the payload is written to by default
pub const DEFAULT_LOCAL_DIR: &str = "/tmp";

/// File name the payload is written under by default
pub const DEFAULT_FILE_NAME: &str = "out.txt";

/// Payload written by default
pub const DEFAULT_PAYLOAD: &[u8] = b"hello\nrust\n";

/// Where the payload goes and what it contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory the local file is created in
    pub local_dir: PathBuf,
    /// Local file name, also the last segment of the remote key
    pub file_name: String,
    /// Bytes written to the local file
    pub payload: Vec<u8>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from(DEFAULT_LOCAL_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
            payload: DEFAULT_PAYLOAD.to_vec(),
        }
    }
}

impl RunOptions {
    /// Override the local directory
    #[must_use]
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    /// Override the file name
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Override the payload
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Full path of the local file
    #[must_use]
    pub fn local_path(&self) -> PathBuf {
        self.local_dir.join(&self.file_name)
    }
}

/// Write the payload to the local file and upload it through `store`
///
/// The config is validated again here so that a hand-built `AppConfig`
/// cannot reach the store with empty required fields.
pub async fn run<S: ObjectStore + ?Sized>(
    config: &AppConfig,
    store: &S,
    options: &RunOptions,
) -> PipelineResult<UploadReport> {
    config.validate().map_err(ConfigError::from)?;

    write_payload(&options.local_path(), &options.payload).await?;

    Uploader::new(&config.s3_config, store)
        .upload_file(&options.local_dir, &options.file_name)
        .await
}

async fn write_payload(path: &Path, payload: &[u8]) -> PipelineResult<()> {
    tokio::fs::write(path, payload)
        .await
        .map_err(|source| PipelineError::LocalFileWrite {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), bytes = payload.len(), "Wrote local file");
    Ok(())
}
