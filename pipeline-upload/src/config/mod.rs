//! Configuration management for pipeline-upload
//!
//! Configuration is assembled from two sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `__` for nesting)
//! 2. The first `app.{env,toml,json}` found in the search paths
//!    (`/config`, then `./config`)
//!
//! Environment variable format: `SECTION__FIELD_NAME`
//! - Use `__` (double underscore) to separate the section from the field
//! - Keys are case-insensitive
//! - Example: `S3_CONFIG__BUCKET_NAME=reports`
//!
//! Only variables under a known section (`S3_CONFIG__*`) are merged.
//!
//! # Example Configuration
//!
//! ```text
//! # config/app.env
//! S3_CONFIG__REGION=eu-west-1
//! S3_CONFIG__BUCKET_NAME=reports
//! S3_CONFIG__PATH_PREFIX=backups
//! # optional; ambient credentials are used when either is empty
//! S3_CONFIG__ACCESS_KEY_ID=
//! S3_CONFIG__SECRET_ACCESS_KEY=
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use pipeline_upload::config::ConfigLoader;
//!
//! # fn example() -> Result<(), pipeline_upload::config::ConfigError> {
//! let config = ConfigLoader::new().load()?;
//! println!("uploading to bucket {}", config.s3_config.bucket_name);
//! # Ok(())
//! # }
//! ```

mod de;
mod error;
mod loader;
mod source;
mod validation;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use error::ConfigError;
pub use loader::{ConfigLoader, CONFIG_NAME, DEFAULT_SEARCH_PATHS, ENV_SECTIONS};
pub use source::{ConfigFile, ConfigFormat, EnvOverrides, KEY_DELIMITER};
pub use validation::{failing_fields, format_validation_errors};

/// Complete application configuration
///
/// Must pass [`Validate::validate`] before use; [`ConfigLoader::load`] does
/// this for you.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AppConfig {
    /// Object storage connection settings (`S3_CONFIG` section)
    #[serde(default)]
    #[validate(nested)]
    pub s3_config: StorageConfig,
}

/// Object storage connection settings
///
/// Required string fields default to empty so that a missing value is
/// reported by validation with its field name instead of as a decode error.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct StorageConfig {
    /// Static access key id; ambient credentials are used when unset
    #[serde(deserialize_with = "de::opt_string")]
    pub access_key_id: Option<String>,

    /// Static secret access key; ambient credentials are used when unset
    #[serde(deserialize_with = "de::opt_string")]
    pub secret_access_key: Option<String>,

    /// Bucket region, e.g. `eu-west-1`
    #[serde(deserialize_with = "de::string")]
    #[validate(length(min = 1, message = "region is required"))]
    pub region: String,

    /// Target bucket
    #[serde(deserialize_with = "de::string")]
    #[validate(length(min = 1, message = "bucket name is required"))]
    pub bucket_name: String,

    /// Key prefix every uploaded object is placed under
    #[serde(deserialize_with = "de::string")]
    #[validate(length(min = 1, message = "path prefix is required"))]
    pub path_prefix: String,

    /// Upper bound on a single upload; unbounded when unset
    #[serde(deserialize_with = "de::opt_u64")]
    #[validate(range(min = 1, message = "upload timeout must be at least one second"))]
    pub upload_timeout_secs: Option<u64>,
}

/// How the storage client obtains credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// Access key id and secret taken from config
    Static,
    /// SDK default provider chain (env, shared profile, instance role, ...)
    Ambient,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Ambient => f.write_str("ambient"),
        }
    }
}

impl StorageConfig {
    /// Access key id and secret, only when both are non-empty
    #[must_use]
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (self.access_key_id.as_deref(), self.secret_access_key.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    /// Which credential branch the storage client will take
    #[must_use]
    pub fn credential_source(&self) -> CredentialSource {
        if self.static_credentials().is_some() {
            CredentialSource::Static
        } else {
            CredentialSource::Ambient
        }
    }

    /// Upload timeout as a `Duration`
    #[must_use]
    pub fn upload_timeout(&self) -> Option<Duration> {
        self.upload_timeout_secs.map(Duration::from_secs)
    }

    /// A view of this config that is safe to print
    #[must_use]
    pub fn redacted(&self) -> RedactedStorageConfig<'_> {
        RedactedStorageConfig {
            region: &self.region,
            bucket_name: &self.bucket_name,
            path_prefix: &self.path_prefix,
            upload_timeout_secs: self.upload_timeout_secs,
            access_key_id: secret_state(self.access_key_id.as_deref()),
            secret_access_key: secret_state(self.secret_access_key.as_deref()),
            credentials: self.credential_source(),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &secret_state(self.access_key_id.as_deref()))
            .field("secret_access_key", &secret_state(self.secret_access_key.as_deref()))
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("path_prefix", &self.path_prefix)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .finish()
    }
}

/// Printable storage settings with secrets replaced by `set`/`unset`
#[derive(Debug, Clone, Serialize)]
pub struct RedactedStorageConfig<'a> {
    /// Bucket region
    pub region: &'a str,
    /// Target bucket
    pub bucket_name: &'a str,
    /// Key prefix
    pub path_prefix: &'a str,
    /// Upload timeout, if any
    pub upload_timeout_secs: Option<u64>,
    /// `set` or `unset`
    pub access_key_id: &'static str,
    /// `set` or `unset`
    pub secret_access_key: &'static str,
    /// Credential branch that will be taken
    pub credentials: CredentialSource,
}

fn secret_state(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "set",
        _ => "unset",
    }
}
