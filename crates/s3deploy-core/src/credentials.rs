//! Authentication descriptor
//!
//! A deployment authenticates either through a named profile from the shared AWS config files
//! or through an explicit access key pair. Mixing the two, or supplying half of a key pair, is
//! rejected before any client is built.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::error::DeployError;

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Profile(String),
    KeyPair { key_id: String, secret: String },
}

impl Credentials {
    /// Validate raw user input into at most one authentication mode.
    ///
    /// Empty strings count as absent. Returns `Ok(None)` when nothing was supplied, in which
    /// case the default AWS credential chain applies.
    pub fn from_parts(
        profile: Option<String>,
        key_id: Option<String>,
        secret: Option<String>,
    ) -> Result<Option<Self>, DeployError> {
        let profile = profile.filter(|p| !p.is_empty());
        let key_id = key_id.filter(|k| !k.is_empty());
        let secret = secret.filter(|s| !s.is_empty());

        if profile.is_some() && (key_id.is_some() || secret.is_some()) {
            return Err(DeployError::InvalidCredentials(
                "Two methods of authentication supplied, please remove either keyId/accessKey or profile from the params.authentication block.".to_string(),
            ));
        }

        match (profile, key_id, secret) {
            (Some(profile), None, None) => Ok(Some(Credentials::Profile(profile))),
            (None, Some(key_id), Some(secret)) => Ok(Some(Credentials::KeyPair { key_id, secret })),
            (None, Some(_), None) => Err(DeployError::InvalidCredentials(
                "`keyId` has been provided, but `accessKey` has not. Please add your `accessKey` and try again.".to_string(),
            )),
            (None, None, Some(_)) => Err(DeployError::InvalidCredentials(
                "`accessKey` has been provided, but `keyId` has not. Please add your `keyId` and try again.".to_string(),
            )),
            _ => Ok(None),
        }
    }

    pub fn profile_name(&self) -> Option<&str> {
        match self {
            Credentials::Profile(name) => Some(name),
            Credentials::KeyPair { .. } => None,
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Credentials::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            Credentials::KeyPair { key_id, .. } => f
                .debug_struct("KeyPair")
                .field("key_id", key_id)
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}
