//! Constants shared across the deployment pipeline.

/// Upper bound on upload attempts per object, including the first one.
pub const MAX_UPLOAD_ATTEMPTS: u32 = 5;

/// Number of display segments the upload progress bar is divided into.
pub const BAR_SEGMENTS: u64 = 60;

/// User metadata key holding the local modification instant of an uploaded object.
pub const LAST_MODIFIED_METADATA_KEY: &str = "Last-Modified";

/// Content type used when no extension mapping exists.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const UPLOAD_COMPLETE_MESSAGE: &str = "Upload complete!";
pub const NO_FILES_FOUND_MESSAGE: &str = "No files found at specified path";
pub const NO_UPDATES_REQUIRED_MESSAGE: &str = "No file updates required, skipping upload...";

/// Base delay between upload attempts when `S3DEPLOY_RETRY_DELAY_MS` is unset.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 250;
