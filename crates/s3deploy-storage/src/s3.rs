use crate::traits::{ObjectHead, ObjectStore, PutObjectRequest, StoreResult};
use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use s3deploy_core::StoreError;
use std::error::Error as StdError;

/// S3 object store implementation
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Convert an SDK failure into a raw store error, keeping the service code and HTTP status.
///
/// Failures that never reached the service (no credentials, unreadable profile) are tagged
/// `CredentialsError` when the error chain says so.
pub(crate) fn store_error<E>(err: SdkError<E, HttpResponse>) -> StoreError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code().map(String::from);
    let context = DisplayErrorContext(&err).to_string();
    let message = err.message().map(String::from).unwrap_or_else(|| context.clone());

    let mut store_err = StoreError::new(message);
    if let Some(status) = status {
        store_err = store_err.with_status(status);
    }

    match (&err, code) {
        (_, Some(code)) => store_err.with_code(code),
        (SdkError::ServiceError(_), None) => store_err,
        (_, None) if context.to_lowercase().contains("credentials") => {
            store_err.with_code("CredentialsError")
        }
        (_, None) => store_err,
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectHead> {
        let result = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => Ok(ObjectHead {
                metadata: output.metadata().cloned().unwrap_or_default(),
            }),
            Err(SdkError::ServiceError(e)) if e.err().is_not_found() => {
                Err(StoreError::new(format!("Object {} not found in {}", key, bucket))
                    .with_code("NotFound")
                    .with_status(404))
            }
            Err(e) => {
                let err = store_error(e);
                tracing::debug!(
                    error = %err,
                    code = ?err.code,
                    bucket = %bucket,
                    key = %key,
                    "S3 head_object failed"
                );
                Err(err)
            }
        }
    }

    async fn put_object(&self, request: &PutObjectRequest) -> StoreResult<()> {
        let size = request.body.len() as u64;
        let start = std::time::Instant::now();

        let mut builder = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .content_type(&request.content_type)
            .body(ByteStream::from(request.body.clone()));

        for (name, value) in &request.metadata {
            builder = builder.metadata(name, value);
        }

        builder.send().await.map_err(|e| {
            let err = store_error(e);
            tracing::warn!(
                error = %err,
                code = ?err.code,
                bucket = %request.bucket,
                key = %request.key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            err
        })?;

        tracing::debug!(
            bucket = %request.bucket,
            key = %request.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}
