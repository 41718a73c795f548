//! Change detection
//!
//! A file needs uploading unless the store holds an object under the same key whose
//! `Last-Modified` metadata equals the local modification time, compared as ISO-8601 text.
//! Every ambiguous case resolves to "changed".

use s3deploy_core::models::format_last_modified;
use s3deploy_core::{ChangeDecision, DeployResult};
use s3deploy_storage::ObjectStore;
use std::path::Path;

use crate::inspect::FileInspector;
use crate::probe::head_object;
use crate::scan::ListedFile;

/// Decide whether `local_root/key` differs from its remote copy in `bucket`.
pub async fn has_changed(
    local_root: &Path,
    key: &str,
    bucket: &str,
    store: &dyn ObjectStore,
    inspector: &dyn FileInspector,
) -> DeployResult<bool> {
    has_changed_at(&local_root.join(key), key, bucket, store, inspector).await
}

/// Same as [`has_changed`] for a file whose on-disk path is already known.
pub async fn has_changed_at(
    path: &Path,
    key: &str,
    bucket: &str,
    store: &dyn ObjectStore,
    inspector: &dyn FileInspector,
) -> DeployResult<bool> {
    let remote = head_object(store, bucket, key).await?;
    if !remote.exists {
        tracing::debug!(key = %key, "New object");
        return Ok(true);
    }

    let Some(stored) = remote.stored_last_modified else {
        tracing::debug!(key = %key, "Remote object has no Last-Modified metadata");
        return Ok(true);
    };

    let Some(local) = inspector.last_modified(path).await else {
        return Ok(true);
    };

    let local = format_last_modified(&local);
    let changed = local != stored;
    if changed {
        tracing::debug!(key = %key, local = %local, stored = %stored, "Object out of date");
    }

    Ok(changed)
}

/// Per-key verdict for one listed file.
pub async fn decide(
    file: &ListedFile,
    bucket: &str,
    store: &dyn ObjectStore,
    inspector: &dyn FileInspector,
) -> DeployResult<ChangeDecision> {
    let changed = has_changed_at(&file.path, &file.key, bucket, store, inspector).await?;
    Ok(ChangeDecision {
        key: file.key.clone(),
        changed,
    })
}
