//! Remote object probe

use s3deploy_core::constants::LAST_MODIFIED_METADATA_KEY;
use s3deploy_core::error::classify;
use s3deploy_core::{DeployResult, ErrorKind};
use s3deploy_storage::ObjectStore;

/// What the store knows about one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteObject {
    pub exists: bool,
    /// `Last-Modified` metadata written by a previous upload
    pub stored_last_modified: Option<String>,
}

impl RemoteObject {
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Look up `key` in `bucket`.
///
/// A missing object is a normal answer (`exists == false`); every other failure is classified
/// and returned.
pub async fn head_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> DeployResult<RemoteObject> {
    match store.head_object(bucket, key).await {
        Ok(head) => Ok(RemoteObject {
            exists: true,
            stored_last_modified: head
                .metadata_value(LAST_MODIFIED_METADATA_KEY)
                .filter(|v| !v.is_empty())
                .map(String::from),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoteObject::absent()),
        Err(e) => Err(classify(e)),
    }
}
