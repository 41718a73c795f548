//! s3deploy Engine
//!
//! Change detection and upload orchestration. Given a directory and a bucket the engine
//! lists every file, decides per file whether the remote copy is stale by comparing the
//! local modification time with the `Last-Modified` metadata stored on the object, uploads
//! the stale ones with bounded retry and returns one aggregate [`DeploymentResult`].
//!
//! All per-file work runs as futures joined on the calling task; nothing is spawned.
//!
//! [`DeploymentResult`]: s3deploy_core::DeploymentResult

pub mod batch;
pub mod change;
pub mod content_type;
pub mod deploy;
pub mod inspect;
pub mod probe;
pub mod progress;
pub mod scan;
pub mod upload;

// Re-export commonly used types
pub use batch::{BatchUploader, UploadOptions};
pub use change::{decide, has_changed, has_changed_at};
pub use deploy::{invalidation_paths, Deployer, SyncOptions};
pub use inspect::{FileInspector, LocalFileInspector};
pub use probe::{head_object, RemoteObject};
pub use progress::{NoProgress, ProgressReporter, SegmentTracker};
pub use scan::{list_entries, ListedFile};
pub use upload::{upload, upload_reporting, RetryPolicy, UploadFailure};
