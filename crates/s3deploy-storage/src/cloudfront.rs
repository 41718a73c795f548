use crate::s3::store_error;
use crate::traits::{CacheInvalidator, StoreResult};
use async_trait::async_trait;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_cloudfront::Client;
use s3deploy_core::StoreError;

/// CloudFront cache invalidation
#[derive(Clone, Debug)]
pub struct CloudFrontInvalidator {
    client: Client,
}

impl CloudFrontInvalidator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheInvalidator for CloudFrontInvalidator {
    async fn invalidate(
        &self,
        distribution_id: &str,
        paths: &[String],
        caller_reference: &str,
    ) -> StoreResult<String> {
        let paths = Paths::builder()
            .quantity(paths.len() as i32)
            .set_items(Some(paths.to_vec()))
            .build()
            .map_err(|e| StoreError::new(format!("Invalid invalidation paths: {}", e)))?;

        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference)
            .build()
            .map_err(|e| StoreError::new(format!("Invalid invalidation batch: {}", e)))?;

        let output = self
            .client
            .create_invalidation()
            .distribution_id(distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| {
                let err = store_error(e);
                tracing::error!(
                    error = %err,
                    code = ?err.code,
                    distribution_id = %distribution_id,
                    "CloudFront invalidation failed"
                );
                err
            })?;

        let id = output
            .invalidation()
            .map(|invalidation| invalidation.id().to_string())
            .ok_or_else(|| {
                StoreError::new(format!(
                    "CloudFront returned no invalidation for distribution {}",
                    distribution_id
                ))
            })?;

        tracing::info!(
            distribution_id = %distribution_id,
            invalidation_id = %id,
            "CloudFront invalidation created"
        );

        Ok(id)
    }
}
