//! Configuration module
//!
//! Environment-driven settings (`.env` is honoured) plus the immutable client configuration
//! built once per deployment request.

use std::env;
use std::time::Duration;

use crate::constants::DEFAULT_RETRY_DELAY_MS;
use crate::credentials::Credentials;
use crate::models::DeploymentRequest;

/// Settings read from the environment. CLI flags take precedence over these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployConfig {
    /// Base delay between upload attempts; 0 means immediate re-attempt
    pub retry_delay_ms: u64,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub s3_region: Option<String>,
    pub aws_region: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            s3_endpoint: None,
            s3_region: None,
            aws_region: None,
        }
    }
}

impl DeployConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let retry_delay_ms = match lookup("S3DEPLOY_RETRY_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("S3DEPLOY_RETRY_DELAY_MS must be a non-negative integer: {}", e)
            })?,
            None => DEFAULT_RETRY_DELAY_MS,
        };

        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            retry_delay_ms,
            s3_endpoint: non_empty("S3_ENDPOINT"),
            s3_region: non_empty("S3_REGION"),
            aws_region: non_empty("AWS_REGION"),
        })
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Region from the environment, `S3_REGION` first.
    pub fn region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }
}

/// Client settings shared by every remote call of one deployment. Never mutated after
/// construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub credentials: Option<Credentials>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientConfig {
    /// Request values win; environment values fill the gaps.
    pub fn for_request(request: &DeploymentRequest, config: &DeployConfig) -> Self {
        Self {
            credentials: request.credentials.clone(),
            region: request
                .region
                .clone()
                .or_else(|| config.region().map(String::from)),
            endpoint_url: request
                .endpoint_url
                .clone()
                .or_else(|| config.s3_endpoint.clone()),
        }
    }
}
