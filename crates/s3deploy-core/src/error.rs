//! Error types module
//!
//! Raw failures reported by the object store or CDN come in as [`StoreError`] and are mapped
//! to a [`DeployError`] through [`classify`]. Every variant knows whether it is terminal, i.e.
//! whether retrying the same request could ever succeed.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::{Path, PathBuf};

use crate::constants::MAX_UPLOAD_ATTEMPTS;

/// Failure reported by a remote service before classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    /// Service error code (e.g. `AccessDenied`, `NoSuchKey`), when the service sent one
    pub code: Option<String>,
    /// HTTP status of the raw response, when one was received
    pub status: Option<u16>,
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            status: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::of(self)
    }
}

/// Taxonomy of remote failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Credentials,
    AccessDenied,
    NotFound,
    Other,
}

impl ErrorKind {
    pub fn of(err: &StoreError) -> Self {
        if let Some(code) = err.code.as_deref() {
            match code {
                "BadRequest" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"
                | "InvalidToken" | "TokenRefreshRequired" => return ErrorKind::BadRequest,
                "CredentialsError" => return ErrorKind::Credentials,
                "AccessDenied" | "Forbidden" => return ErrorKind::AccessDenied,
                "NotFound" | "NoSuchKey" => return ErrorKind::NotFound,
                _ => {}
            }
        }

        match err.status {
            Some(400) => ErrorKind::BadRequest,
            Some(403) => ErrorKind::AccessDenied,
            Some(404) if err.code.is_none() => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::BadRequest => write!(f, "BadRequest"),
            ErrorKind::Credentials => write!(f, "CredentialsError"),
            ErrorKind::AccessDenied => write!(f, "AccessDenied"),
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Received BadRequest code from AWS API, please verify that the supplied profile/keys are still valid and have not expired.")]
    BadRequest,

    #[error("Specified credentials are missing in your ~/.aws/credentials file - {0}")]
    Credentials(String),

    #[error("You are not permitted to access the resource you attempted to access")]
    AccessDenied,

    #[error("Object not found: {0}")]
    NotFound(String),

    /// Unclassified store failure, message passed through unchanged
    #[error("{0}")]
    Store(#[source] StoreError),

    #[error("Error: Unable to process object {key}, reattempted for {attempts} (MAX)")]
    UploadExhausted { key: String, attempts: u32 },

    #[error("Specified path does not exist. Please specify a valid directory path. ({})", .0.display())]
    PathNotFound(PathBuf),

    #[error("Specified path is not a directory, please specify a valid directory path - this module cannot process individual files ({})", .0.display())]
    NotADirectory(PathBuf),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

impl DeployError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        DeployError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn upload_exhausted(key: impl Into<String>) -> Self {
        DeployError::UploadExhausted {
            key: key.into(),
            attempts: MAX_UPLOAD_ATTEMPTS,
        }
    }

    /// Whether a retry of the failed operation is pointless.
    ///
    /// Only unclassified store failures are transient.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeployError::Store(_))
    }

    /// Machine-readable error code, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            DeployError::BadRequest => "BAD_REQUEST",
            DeployError::Credentials(_) => "CREDENTIALS_ERROR",
            DeployError::AccessDenied => "ACCESS_DENIED",
            DeployError::NotFound(_) => "NOT_FOUND",
            DeployError::Store(_) => "STORE_ERROR",
            DeployError::UploadExhausted { .. } => "UPLOAD_EXHAUSTED",
            DeployError::PathNotFound(_) => "PATH_NOT_FOUND",
            DeployError::NotADirectory(_) => "NOT_A_DIRECTORY",
            DeployError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            DeployError::Io { .. } => "IO_ERROR",
            DeployError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Map a raw store failure onto the error taxonomy.
pub fn classify(err: StoreError) -> DeployError {
    match err.kind() {
        ErrorKind::BadRequest => DeployError::BadRequest,
        ErrorKind::Credentials => DeployError::Credentials(err.message),
        ErrorKind::AccessDenied => DeployError::AccessDenied,
        ErrorKind::NotFound => DeployError::NotFound(err.message),
        ErrorKind::Other => DeployError::Store(err),
    }
}

impl From<StoreError> for DeployError {
    fn from(err: StoreError) -> Self {
        classify(err)
    }
}
