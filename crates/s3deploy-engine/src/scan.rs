//! Directory listing for upload.
//!
//! Recursively walks the upload root and produces object keys: paths relative to the root,
//! joined with `/` on every platform.

use s3deploy_core::{DeployError, DeployResult};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// List every file under `root`, sorted by path.
///
/// Symlinks to files are followed; symlinked directories are not descended into.
pub async fn list_files(root: &Path) -> DeployResult<Vec<PathBuf>> {
    let metadata = tokio::fs::metadata(root).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => DeployError::PathNotFound(root.to_path_buf()),
        _ => DeployError::io(root, e),
    })?;
    if !metadata.is_dir() {
        return Err(DeployError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| DeployError::io(&dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DeployError::io(&dir, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| DeployError::io(&path, e))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            } else if file_type.is_symlink() {
                match tokio::fs::metadata(&path).await {
                    Ok(target) if target.is_file() => files.push(path),
                    Ok(_) => {
                        tracing::debug!(path = %path.display(), "Skipping symlinked directory");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path.display(), "Skipping dangling symlink");
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Object key of `path` relative to `root`, or `None` when `path` is outside `root`.
pub fn object_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// A listed file: where it lives on disk and the object key it is stored under.
///
/// The key is derived lossily for names that are not valid UTF-8; `path` is always the real
/// on-disk path and is what every read uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub path: PathBuf,
    pub key: String,
}

impl ListedFile {
    /// Entry for `key` under `root`.
    pub fn under(root: &Path, key: &str) -> Self {
        Self {
            path: root.join(key),
            key: key.to_string(),
        }
    }
}

/// List `root` and pair every file with its object key.
pub async fn list_entries(root: &Path) -> DeployResult<Vec<ListedFile>> {
    let files = list_files(root).await?;
    Ok(files
        .into_iter()
        .filter_map(|path| object_key(root, &path).map(|key| ListedFile { path, key }))
        .collect())
}
