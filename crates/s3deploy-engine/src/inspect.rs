//! Local file metadata

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use std::path::Path;

/// Source of local modification times.
#[async_trait]
pub trait FileInspector: Send + Sync {
    /// Last modification instant of `path`, or `None` when it cannot be determined.
    async fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// Reads modification times from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileInspector;

#[async_trait]
impl FileInspector for LocalFileInspector {
    async fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    path = %path.display(),
                    "Modification time unavailable"
                );
                return None;
            }
        };

        // Stored metadata carries millisecond precision
        Some(DateTime::<Utc>::from(modified).trunc_subsecs(3))
    }
}
