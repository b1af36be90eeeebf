//! Amazon S3 backend built on `aws-sdk-s3`

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::fs::File;

use super::key::object_key;
use super::traits::ObjectStore;
use super::types::{PutReceipt, StorageError, StorageResult};
use crate::config::StorageConfig;

/// Provider name attached to credentials taken from config
const STATIC_PROVIDER_NAME: &str = "pipeline-upload-static";

/// S3 object store
///
/// Sends one `PutObject` per upload. An optional timeout bounds the whole
/// request; there are no retries beyond what the SDK does internally.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    timeout: Option<Duration>,
}

impl S3ObjectStore {
    /// Create a store around an existing client
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Bound every put by `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a client bound to the configured region
    pub async fn from_config(config: &StorageConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::new(Client::new(&sdk_config)).with_timeout(config.upload_timeout())
    }

    /// Underlying SDK client
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Configured put timeout
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// SDK config for the configured region and credentials
///
/// Uses the configured access key and secret when both are non-empty.
/// Otherwise the SDK default provider chain is used, which checks:
/// 1. Environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
/// 2. Shared config and credentials files (`~/.aws/`)
/// 3. Web identity tokens, container and instance roles
pub async fn load_sdk_config(config: &StorageConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some((access_key_id, secret_access_key)) = config.static_credentials() {
        tracing::info!(
            "Access key and secret key have been provided, connecting with static credentials"
        );
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            STATIC_PROVIDER_NAME,
        ));
    } else {
        tracing::info!(
            "Access key and/or secret key have not been provided, connecting with ambient credentials"
        );
    }

    loader.load().await
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: File) -> StorageResult<PutReceipt> {
        let object_key = object_key(key);
        let body = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?;

        tracing::debug!(bucket, key = object_key, "Sending PutObject");
        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(object_key)
            .body(body)
            .send();

        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, request)
                .await
                .map_err(|_| StorageError::Timeout(timeout))?,
            None => request.await,
        };
        let output =
            result.map_err(|e| StorageError::upload(DisplayErrorContext(&e).to_string()))?;

        Ok(PutReceipt::new(bucket, object_key)
            .with_e_tag(output.e_tag())
            .with_version_id(output.version_id()))
    }
}
