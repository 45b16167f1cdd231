//! S3-backed publisher

use super::Publisher;
use crate::config::Credentials;
use crate::error::{PublishError, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::info;

/// Publisher backed by an S3-compatible object store
///
/// Built from opaque static credentials; nothing is validated at
/// construction time — bad material surfaces as an upload failure.
pub struct S3Publisher {
    client: aws_sdk_s3::Client,
}

impl S3Publisher {
    /// Build a publisher from static credentials and a region name
    pub fn new(credentials: &Credentials, region: &str) -> Self {
        let provider = aws_credential_types::Credentials::from_keys(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None,
        );
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(provider)
            .build();
        Self {
            client: aws_sdk_s3::Client::from_conf(config),
        }
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    async fn publish(&self, file: &Path, bucket: &str, key: &str) -> Result<()> {
        let body = ByteStream::from_path(file)
            .await
            .map_err(|e| PublishError::ReadLocal {
                path: file.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        info!(bucket, key, file = %file.display(), "output file published");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
