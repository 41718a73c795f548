//! Deployment orchestration
//!
//! One deployment walks these stages:
//!
//! ```text
//! listing -> empty                      -> done
//!         -> force listing  -> uploading -> [invalidating] -> done
//!         -> deciding -> none changed   -> done
//!                     -> uploading      -> [invalidating] -> done
//! ```
//!
//! Any error ends the run and is returned to the caller as is.

use chrono::Utc;
use futures::future::try_join_all;
use s3deploy_core::constants::{NO_FILES_FOUND_MESSAGE, NO_UPDATES_REQUIRED_MESSAGE};
use s3deploy_core::error::classify;
use s3deploy_core::{DeployError, DeployResult, DeploymentRequest, DeploymentResult};
use s3deploy_storage::{CacheInvalidator, ObjectStore};
use std::path::Path;
use std::sync::Arc;

use crate::batch::{BatchUploader, UploadOptions};
use crate::change::decide;
use crate::inspect::{FileInspector, LocalFileInspector};
use crate::progress::{NoProgress, ProgressReporter};
use crate::scan::{list_entries, ListedFile};
use crate::upload::RetryPolicy;

/// Per-run switches of [`Deployer::upload_changed_files_in_dir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Skip change detection and upload every file
    pub reupload_all: bool,
    pub verbose: bool,
}

impl From<&DeploymentRequest> for SyncOptions {
    fn from(request: &DeploymentRequest) -> Self {
        Self {
            reupload_all: request.reupload_all,
            verbose: request.verbose,
        }
    }
}

/// Drives a deployment against an object store and, optionally, a CDN.
#[derive(Clone)]
pub struct Deployer {
    store: Arc<dyn ObjectStore>,
    invalidator: Option<Arc<dyn CacheInvalidator>>,
    inspector: Arc<dyn FileInspector>,
    progress: Arc<dyn ProgressReporter>,
    retry: RetryPolicy,
}

impl Deployer {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            invalidator: None,
            inspector: Arc::new(LocalFileInspector),
            progress: Arc::new(NoProgress),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = Some(invalidator);
        self
    }

    pub fn with_inspector(mut self, inspector: Arc<dyn FileInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Upload every file under `root` whose remote copy in `bucket` is stale.
    ///
    /// `changed_files` lists the keys selected for upload, sorted.
    pub async fn upload_changed_files_in_dir(
        &self,
        root: &Path,
        bucket: &str,
        options: SyncOptions,
    ) -> DeployResult<DeploymentResult> {
        let files = list_entries(root).await?;
        let total = files.len();

        if files.is_empty() {
            tracing::info!(path = %root.display(), "No files found");
            return Ok(DeploymentResult::new(Vec::new(), NO_FILES_FOUND_MESSAGE));
        }

        let changed = if options.reupload_all {
            tracing::info!(
                "{} objects found, re-uploading all to S3 Bucket: {}",
                total,
                bucket
            );
            files
        } else {
            tracing::info!("Determining changed files...");
            let changed = self.changed_files(files, bucket).await?;
            if changed.is_empty() {
                tracing::info!(bucket = %bucket, files = total, "All objects up to date");
                return Ok(DeploymentResult::new(Vec::new(), NO_UPDATES_REQUIRED_MESSAGE));
            }
            tracing::info!(
                "{} objects found, uploading {} objects that require updates to S3 Bucket: {}...",
                total,
                changed.len(),
                bucket
            );
            changed
        };

        let uploader = BatchUploader::new(
            self.store.as_ref(),
            self.inspector.as_ref(),
            self.progress.as_ref(),
            UploadOptions {
                verbose: options.verbose,
                retry: self.retry,
            },
        );
        let message = uploader.upload_listed(&changed, bucket).await?;

        let keys = changed.into_iter().map(|file| file.key).collect();
        Ok(DeploymentResult::new(keys, message))
    }

    /// Run a full deployment: upload, then invalidate the CDN when a distribution is
    /// configured and something changed.
    pub async fn deploy(&self, request: &DeploymentRequest) -> DeployResult<DeploymentResult> {
        let invalidator = self.invalidator_for(request)?;

        tracing::info!(
            bucket = %request.bucket,
            path = %request.source_dir.display(),
            "Starting deployment to S3 bucket: {}...",
            request.bucket
        );

        let result = self
            .upload_changed_files_in_dir(
                &request.source_dir,
                &request.bucket,
                SyncOptions::from(request),
            )
            .await?;

        let Some(invalidator) = invalidator else {
            return Ok(result);
        };
        if !request.wants_invalidation(result.changed_files.len()) {
            return Ok(result);
        }

        let distribution_id = request.distribution_id.as_deref().unwrap_or_default();
        tracing::info!("{}", result.message);
        tracing::info!(
            "Commencing invalidation operation for distribution {} of {}...",
            distribution_id,
            result.changed_files.len()
        );

        let paths = invalidation_paths(&result.changed_files, request.reupload_all);
        let caller_reference = Utc::now().timestamp_millis().to_string();
        let invalidation_id = invalidator
            .invalidate(distribution_id, &paths, &caller_reference)
            .await
            .map_err(classify)?;

        let message = format!(
            "Invalidation with ID {} has started for {} changed files!",
            invalidation_id,
            result.changed_files.len()
        );

        Ok(DeploymentResult {
            changed_files: result.changed_files,
            message,
            invalidation_id: Some(invalidation_id),
        })
    }

    /// CDN client for a request that names a distribution; fails before any work is done when
    /// none is configured.
    fn invalidator_for(
        &self,
        request: &DeploymentRequest,
    ) -> DeployResult<Option<&Arc<dyn CacheInvalidator>>> {
        let Some(distribution_id) = request.distribution_id.as_deref().filter(|id| !id.is_empty())
        else {
            return Ok(None);
        };

        self.invalidator.as_ref().map(Some).ok_or_else(|| {
            DeployError::Config(format!(
                "No CDN client configured to invalidate distribution {}",
                distribution_id
            ))
        })
    }

    async fn changed_files(
        &self,
        files: Vec<ListedFile>,
        bucket: &str,
    ) -> DeployResult<Vec<ListedFile>> {
        let store = self.store.as_ref();
        let inspector = self.inspector.as_ref();

        let decisions =
            try_join_all(files.iter().map(|file| decide(file, bucket, store, inspector))).await?;

        Ok(files
            .into_iter()
            .zip(decisions)
            .filter(|(_, decision)| decision.changed)
            .map(|(file, _)| file)
            .collect())
    }
}

/// CDN paths for a set of changed keys: each key prefixed with `/`, or a single wildcard
/// when everything was re-uploaded.
pub fn invalidation_paths(changed_files: &[String], reupload_all: bool) -> Vec<String> {
    if reupload_all {
        return vec!["/*".to_string()];
    }
    changed_files.iter().map(|key| format!("/{}", key)).collect()
}
