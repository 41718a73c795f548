//! Deployment data model
//!
//! Values here live for a single deployment run. The only state that survives between runs is
//! the `Last-Modified` metadata stored alongside each uploaded object.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::credentials::Credentials;

/// Render an instant the way it is stored in object metadata (`2017-09-12T15:48:06.228Z`).
pub fn format_last_modified(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Immutable input of one deployment.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    /// Absolute path of the directory to upload
    pub source_dir: PathBuf,
    pub bucket: String,
    pub credentials: Option<Credentials>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers
    pub endpoint_url: Option<String>,
    /// CloudFront distribution to invalidate after a successful upload
    pub distribution_id: Option<String>,
    /// Skip change detection and upload every file
    pub reupload_all: bool,
    pub verbose: bool,
}

impl DeploymentRequest {
    /// Build a request with defaults for every optional field.
    ///
    /// A relative `source_dir` is resolved against the current working directory.
    pub fn new(source_dir: impl Into<PathBuf>, bucket: impl Into<String>) -> std::io::Result<Self> {
        let source_dir = source_dir.into();
        let source_dir = if source_dir.is_absolute() {
            source_dir
        } else {
            std::env::current_dir()?.join(source_dir)
        };

        Ok(Self {
            source_dir,
            bucket: bucket.into(),
            credentials: None,
            region: None,
            endpoint_url: None,
            distribution_id: None,
            reupload_all: false,
            verbose: false,
        })
    }

    /// Whether a CDN invalidation should follow an upload of `changed` objects.
    pub fn wants_invalidation(&self, changed: usize) -> bool {
        self.distribution_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
            && changed > 0
    }
}

/// One file discovered under the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    /// Path relative to the upload root with `/` separators; used as the object key
    pub key: String,
    pub content_type: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Metadata value stored with the uploaded object, if the local instant is known.
    pub fn last_modified_tag(&self) -> Option<String> {
        self.last_modified.as_ref().map(format_last_modified)
    }
}

/// Per-file verdict of the change detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDecision {
    pub key: String,
    pub changed: bool,
}

/// Result of uploading one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub key: String,
    pub attempts: u32,
    /// Final error message, `None` when the upload succeeded
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn succeeded_after(key: impl Into<String>, attempts: u32) -> Self {
        Self {
            key: key.into(),
            attempts,
            error: None,
        }
    }

    pub fn failed(key: impl Into<String>, attempts: u32, error: &impl std::fmt::Display) -> Self {
        Self {
            key: key.into(),
            attempts,
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate output of one deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    /// Keys selected for upload, sorted
    pub changed_files: Vec<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalidation_id: Option<String>,
}

impl DeploymentResult {
    pub fn new(changed_files: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            changed_files,
            message: message.into(),
            invalidation_id: None,
        }
    }
}
