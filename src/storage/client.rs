use super::ObjectStore;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(config: &SdkConfig, bucket: String) -> Self {
        Self {
            client: S3Client::new(config),
            bucket,
        }
    }
}

/// Shared AWS configuration for the S3 and CloudFront clients, built from
/// static credentials rather than the default provider chain.
pub async fn load_aws_config(
    access_key_id: String,
    secret_access_key: String,
    region: String,
) -> SdkConfig {
    let credentials = aws_sdk_s3::config::Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "picboard-env",
    );

    aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(aws_sdk_s3::config::Region::new(region))
        .load()
        .await
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        let body = ByteStream::from(data.to_vec());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to upload {}: {}", key, e)))?;

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to delete {}: {}", key, e)))?;

        Ok(())
    }
}
