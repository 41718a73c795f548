//! Batch upload coordination
//!
//! Every file of a batch is inspected, read and uploaded concurrently. The first fatal error
//! fails the whole batch; objects already written stay written.

use futures::future::try_join_all;
use s3deploy_core::constants::{LAST_MODIFIED_METADATA_KEY, UPLOAD_COMPLETE_MESSAGE};
use s3deploy_core::{DeployError, DeployResult, FileRecord, UploadOutcome};
use s3deploy_storage::{ObjectStore, PutObjectRequest};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::content_type;
use crate::inspect::FileInspector;
use crate::progress::{ProgressReporter, SegmentTracker};
use crate::scan::ListedFile;
use crate::upload::{upload_reporting, RetryPolicy};

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadOptions {
    /// Log every successful upload at info level
    pub verbose: bool,
    pub retry: RetryPolicy,
}

pub struct BatchUploader<'a> {
    store: &'a dyn ObjectStore,
    inspector: &'a dyn FileInspector,
    progress: &'a dyn ProgressReporter,
    options: UploadOptions,
}

impl<'a> BatchUploader<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        inspector: &'a dyn FileInspector,
        progress: &'a dyn ProgressReporter,
        options: UploadOptions,
    ) -> Self {
        Self {
            store,
            inspector,
            progress,
            options,
        }
    }

    /// Upload `keys` (relative to `root`) to `bucket`.
    ///
    /// Resolves to the completion message once every object is written.
    pub async fn upload_all(
        &self,
        root: &Path,
        keys: &[String],
        bucket: &str,
    ) -> DeployResult<String> {
        let files: Vec<ListedFile> = keys.iter().map(|key| ListedFile::under(root, key)).collect();
        self.upload_listed(&files, bucket).await
    }

    /// Upload already-listed files to `bucket`, reading each from its listed path.
    pub async fn upload_listed(&self, files: &[ListedFile], bucket: &str) -> DeployResult<String> {
        let outcomes = self.upload_files(files, bucket).await?;

        let retried = outcomes.iter().filter(|o| o.attempts > 1).count();
        tracing::info!(
            bucket = %bucket,
            uploaded = outcomes.len(),
            retried,
            "Batch upload finished"
        );

        Ok(UPLOAD_COMPLETE_MESSAGE.to_string())
    }

    /// Upload `files` and return one outcome per file, in input order.
    ///
    /// Outcomes of keys that finished before a fatal error, failed ones included, are logged
    /// when the batch is rejected.
    pub async fn upload_files(
        &self,
        files: &[ListedFile],
        bucket: &str,
    ) -> DeployResult<Vec<UploadOutcome>> {
        let tracker = SegmentTracker::start(self.progress, files.len());
        let finished = Mutex::new(Vec::with_capacity(files.len()));

        let result = try_join_all(
            files
                .iter()
                .map(|file| self.upload_one(file, bucket, &tracker, &finished)),
        )
        .await;

        match result {
            Ok(outcomes) => {
                tracker.finish();
                Ok(outcomes)
            }
            Err(err) => {
                let finished = finished.into_inner().unwrap_or_else(PoisonError::into_inner);
                let uploaded = finished.iter().filter(|o| o.succeeded()).count();
                for failed in finished.iter().filter(|o| !o.succeeded()) {
                    tracing::error!(
                        bucket = %bucket,
                        key = %failed.key,
                        attempts = failed.attempts,
                        error = failed.error.as_deref().unwrap_or_default(),
                        "Object not uploaded"
                    );
                }
                tracing::error!(
                    bucket = %bucket,
                    uploaded,
                    total = files.len(),
                    error_code = err.error_code(),
                    "Batch upload aborted"
                );
                Err(err)
            }
        }
    }

    async fn upload_one(
        &self,
        file: &ListedFile,
        bucket: &str,
        tracker: &SegmentTracker<'_>,
        finished: &Mutex<Vec<UploadOutcome>>,
    ) -> DeployResult<UploadOutcome> {
        let record = |outcome: &UploadOutcome| {
            finished
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(outcome.clone());
        };

        let file_record = self.inspect(file).await;
        let body = match tokio::fs::read(&file_record.absolute_path).await {
            Ok(body) => body,
            Err(e) => {
                let err = DeployError::io(&file_record.absolute_path, e);
                record(&UploadOutcome::failed(&file.key, 0, &err));
                return Err(err);
            }
        };

        let mut metadata = HashMap::new();
        if let Some(tag) = file_record.last_modified_tag() {
            metadata.insert(LAST_MODIFIED_METADATA_KEY.to_string(), tag);
        }

        let request = PutObjectRequest {
            bucket: bucket.to_string(),
            key: file_record.key,
            body: body.into(),
            content_type: file_record.content_type,
            metadata,
        };

        let outcome = match upload_reporting(self.store, &request, 1, &self.options.retry).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                record(&failure.outcome);
                return Err(failure.error);
            }
        };
        record(&outcome);

        if self.options.verbose {
            tracing::info!("Successfully uploaded {} to {}", outcome.key, bucket);
        } else {
            tracing::debug!(key = %outcome.key, bucket = %bucket, attempts = outcome.attempts, "Uploaded");
        }

        tracker.item_done();
        Ok(outcome)
    }

    async fn inspect(&self, file: &ListedFile) -> FileRecord {
        let last_modified = self.inspector.last_modified(&file.path).await;
        let content_type = content_type::resolve(&file.path).to_string();

        FileRecord {
            absolute_path: file.path.clone(),
            key: file.key.clone(),
            content_type,
            last_modified,
        }
    }
}
