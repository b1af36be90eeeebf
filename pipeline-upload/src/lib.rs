//! pipeline-upload: write a payload locally and push it to an S3 bucket
//!
//! The crate covers the whole flow of a one-shot upload job:
//! - **config**: locate `app.{env,toml,json}`, merge `S3_CONFIG__*` environment
//!   variables, decode and validate into [`config::AppConfig`]
//! - **storage**: remote key derivation and the [`storage::ObjectStore`] seam,
//!   with an `aws-sdk-s3` backed implementation
//! - **upload** / **pipeline**: open, put, delete, report
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pipeline_upload::config::ConfigLoader;
//! use pipeline_upload::pipeline::{self, RunOptions};
//! use pipeline_upload::storage::S3ObjectStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConfigLoader::new().load()?;
//! let store = S3ObjectStore::from_config(&config.s3_config).await;
//!
//! let report = pipeline::run(&config, &store, &RunOptions::default()).await?;
//! println!("uploaded to {}", report.location);
//! # Ok(())
//! # }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::missing_errors_doc)]

pub mod build_info;
pub mod config;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod storage;
pub mod testing;
pub mod upload;

pub use error::{PipelineError, PipelineResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, ConfigError, ConfigLoader, StorageConfig};
    pub use crate::error::{PipelineError, PipelineResult};
    pub use crate::pipeline::{run, RunOptions};
    pub use crate::storage::{ObjectStore, S3ObjectStore};
    pub use crate::upload::{UploadReport, Uploader};
}
