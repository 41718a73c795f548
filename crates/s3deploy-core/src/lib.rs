//! s3deploy Core Library
//!
//! This crate provides the domain model, error taxonomy, credential handling and
//! configuration shared by the storage adapters, the deployment engine and the CLI.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ClientConfig, DeployConfig};
pub use credentials::Credentials;
pub use error::{DeployError, DeployResult, ErrorKind, StoreError};
pub use models::{
    ChangeDecision, DeploymentRequest, DeploymentResult, FileRecord, UploadOutcome,
};
