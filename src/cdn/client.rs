use super::{caller_reference, CdnInvalidator};
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_cloudfront::Client as CloudFrontClient;
use tracing::info;

pub struct CloudFrontInvalidator {
    client: CloudFrontClient,
    distribution_id: String,
}

impl CloudFrontInvalidator {
    pub fn new(config: &SdkConfig, distribution_id: String) -> Self {
        Self {
            client: CloudFrontClient::new(config),
            distribution_id,
        }
    }
}

#[async_trait]
impl CdnInvalidator for CloudFrontInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<()> {
        let quantity = i32::try_from(paths.len())
            .map_err(|_| Error::Cdn(format!("Too many paths: {}", paths.len())))?;

        let cf_paths = Paths::builder()
            .quantity(quantity)
            .set_items(Some(paths.to_vec()))
            .build()
            .map_err(|e| Error::Cdn(format!("Invalid invalidation paths: {}", e)))?;

        let batch = InvalidationBatch::builder()
            .paths(cf_paths)
            .caller_reference(caller_reference(paths))
            .build()
            .map_err(|e| Error::Cdn(format!("Invalid invalidation batch: {}", e)))?;

        let response = self
            .client
            .create_invalidation()
            .distribution_id(&self.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| Error::Cdn(format!("Failed to create invalidation: {}", e)))?;

        if let Some(invalidation) = response.invalidation() {
            info!(
                "Invalidation {} is {}",
                invalidation.id(),
                invalidation.status()
            );
        }

        Ok(())
    }
}
