//! s3deploy Storage Library
//!
//! Minimal capability traits for the remote services a deployment talks to, plus their AWS
//! implementations:
//!
//! - [`ObjectStore`]: probe and upload single objects (`aws-sdk-s3`)
//! - [`CacheInvalidator`]: purge CDN paths (`aws-sdk-cloudfront`)
//!
//! Adapters report failures as raw [`StoreError`]s; classification into the deployment error
//! taxonomy happens in the caller.

#[cfg(feature = "aws")]
pub mod cloudfront;
#[cfg(feature = "aws")]
pub mod factory;
#[cfg(feature = "aws")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "aws")]
pub use cloudfront::CloudFrontInvalidator;
#[cfg(feature = "aws")]
pub use factory::{create_clients, Clients};
#[cfg(feature = "aws")]
pub use s3::S3ObjectStore;
pub use s3deploy_core::StoreError;
pub use traits::{CacheInvalidator, ObjectHead, ObjectStore, PutObjectRequest, StoreResult};
