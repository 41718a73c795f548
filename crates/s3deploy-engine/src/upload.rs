//! Single-object upload with bounded retry

use rand::Rng;
use s3deploy_core::constants::{DEFAULT_RETRY_DELAY_MS, MAX_UPLOAD_ATTEMPTS};
use s3deploy_core::error::classify;
use s3deploy_core::{DeployError, DeployResult, UploadOutcome};
use s3deploy_storage::{ObjectStore, PutObjectRequest};
use std::time::Duration;

/// Delay between upload attempts. The number of attempts is fixed at
/// [`MAX_UPLOAD_ATTEMPTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Re-attempt immediately after a failure.
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
        }
    }

    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// Jittered delay after failed attempt number `attempt`: uniform in
    /// `[0, base_delay * attempt]`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = base_ms.saturating_mul(u64::from(attempt.max(1)));
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// A failed upload: the per-key record and the error that ends the batch.
#[derive(Debug)]
pub struct UploadFailure {
    pub outcome: UploadOutcome,
    pub error: DeployError,
}

/// Upload one object, starting at attempt number `attempt` (1-based).
///
/// Terminal failures (bad request, credentials, access denied) are returned at once.
/// Anything else is retried until [`MAX_UPLOAD_ATTEMPTS`] attempts have been made, after
/// which [`DeployError::UploadExhausted`] names the key.
pub async fn upload(
    store: &dyn ObjectStore,
    request: &PutObjectRequest,
    attempt: u32,
    policy: &RetryPolicy,
) -> DeployResult<UploadOutcome> {
    upload_reporting(store, request, attempt, policy)
        .await
        .map_err(|failure| failure.error)
}

/// [`upload`], keeping the attempt count and final error of a failed object.
pub async fn upload_reporting(
    store: &dyn ObjectStore,
    request: &PutObjectRequest,
    attempt: u32,
    policy: &RetryPolicy,
) -> Result<UploadOutcome, UploadFailure> {
    let mut attempt = attempt.max(1);

    loop {
        let err = match store.put_object(request).await {
            Ok(()) => return Ok(UploadOutcome::succeeded_after(&request.key, attempt)),
            Err(raw) => classify(raw),
        };

        if err.is_terminal() {
            tracing::error!(
                key = %request.key,
                attempt,
                error_code = err.error_code(),
                error = %err,
                "Upload failed with a terminal error"
            );
            return Err(UploadFailure {
                outcome: UploadOutcome::failed(&request.key, attempt, &err),
                error: err,
            });
        }

        if attempt >= MAX_UPLOAD_ATTEMPTS {
            tracing::error!(
                key = %request.key,
                attempts = attempt,
                error = %err,
                "Upload attempts exhausted"
            );
            let error = DeployError::upload_exhausted(&request.key);
            return Err(UploadFailure {
                outcome: UploadOutcome::failed(&request.key, attempt, &error),
                error,
            });
        }

        let delay = policy.delay_after(attempt);
        tracing::warn!(
            key = %request.key,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Upload failed, retrying"
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        attempt += 1;
    }
}
