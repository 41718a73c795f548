//! Remote capability traits
//!
//! The deployment engine only ever needs two object-store calls and one CDN call. Backends
//! implement these traits; tests substitute in-memory doubles.

use async_trait::async_trait;
use bytes::Bytes;
use s3deploy_core::StoreError;
use std::collections::HashMap;

/// Result type for remote operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Stored state of an existing object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHead {
    /// User metadata as returned by the store
    pub metadata: HashMap<String, String>,
}

impl ObjectHead {
    pub fn with_metadata(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(key.into(), value.into());
        Self { metadata }
    }

    /// Metadata lookup ignoring case; S3 lower-cases user metadata keys on the way back.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Everything needed to write one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// Object storage abstraction
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's metadata.
    ///
    /// A missing object is reported as an error whose kind is `NotFound`.
    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectHead>;

    /// Create or replace an object.
    async fn put_object(&self, request: &PutObjectRequest) -> StoreResult<()>;
}

/// CDN cache invalidation abstraction
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Request invalidation of `paths` and return the invalidation id.
    async fn invalidate(
        &self,
        distribution_id: &str,
        paths: &[String],
        caller_reference: &str,
    ) -> StoreResult<String>;
}
