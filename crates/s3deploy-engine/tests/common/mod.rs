//! In-memory doubles for the remote capabilities.

#![allow(dead_code)]

use async_trait::async_trait;
use s3deploy_core::StoreError;
use s3deploy_storage::{CacheInvalidator, ObjectHead, ObjectStore, PutObjectRequest, StoreResult};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Object store keeping objects in a map. Upload failures can be scripted per call.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, PutObjectRequest>>,
    put_failures: Mutex<VecDeque<StoreError>>,
    head_failure: Mutex<Option<StoreError>>,
    pub head_calls: AtomicUsize,
    pub put_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object carrying `Last-Modified` metadata.
    pub fn insert(&self, bucket: &str, key: &str, last_modified: Option<&str>) {
        let mut metadata = HashMap::new();
        if let Some(value) = last_modified {
            metadata.insert("last-modified".to_string(), value.to_string());
        }
        let request = PutObjectRequest {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: Default::default(),
            content_type: "application/octet-stream".to_string(),
            metadata,
        };
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{bucket}/{key}"), request);
    }

    /// Make the next `count` uploads fail with `err`.
    pub fn fail_puts(&self, count: usize, err: StoreError) {
        let mut failures = self.put_failures.lock().unwrap();
        for _ in 0..count {
            failures.push_back(err.clone());
        }
    }

    pub fn fail_heads(&self, err: StoreError) {
        *self.head_failure.lock().unwrap() = Some(err);
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<PutObjectRequest> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{key}"))
            .cloned()
    }

    pub fn heads(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectHead> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.head_failure.lock().unwrap().clone() {
            return Err(err);
        }

        match self.objects.lock().unwrap().get(&format!("{bucket}/{key}")) {
            // S3 hands user metadata back with lower-cased keys
            Some(object) => Ok(ObjectHead {
                metadata: object
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.to_lowercase(), v.clone()))
                    .collect(),
            }),
            None => Err(StoreError::new("Not Found")
                .with_code("NotFound")
                .with_status(404)),
        }
    }

    async fn put_object(&self, request: &PutObjectRequest) -> StoreResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.put_failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", request.bucket, request.key), request.clone());
        Ok(())
    }
}

/// Records invalidation requests.
#[derive(Default)]
pub struct RecordingInvalidator {
    pub requests: Mutex<Vec<(String, Vec<String>)>>,
    pub failure: Option<StoreError>,
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(
        &self,
        distribution_id: &str,
        paths: &[String],
        _caller_reference: &str,
    ) -> StoreResult<String> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.requests
            .lock()
            .unwrap()
            .push((distribution_id.to_string(), paths.to_vec()));
        Ok("I2J0I21PCUYOIK".to_string())
    }
}

/// Write `files` (relative path, contents) under `root`, creating directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
}
