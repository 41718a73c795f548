use crate::{CacheInvalidator, CloudFrontInvalidator, ObjectStore, S3ObjectStore};
use aws_config::{BehaviorVersion, SdkConfig};
use s3deploy_core::{ClientConfig, Credentials};
use std::sync::Arc;

/// Remote clients for one deployment, built from a single immutable configuration.
#[derive(Clone)]
pub struct Clients {
    pub store: Arc<dyn ObjectStore>,
    pub invalidator: Arc<dyn CacheInvalidator>,
}

/// Resolve AWS settings for the configured credentials and region.
pub async fn load_sdk_config(config: &ClientConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    match &config.credentials {
        Some(Credentials::Profile(name)) => {
            loader = loader.profile_name(name);
        }
        Some(Credentials::KeyPair { key_id, secret }) => {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                "s3deploy",
            ));
        }
        None => {}
    }

    if let Some(ref region) = config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    loader.load().await
}

/// Create the object store and CDN clients for a deployment
pub async fn create_clients(config: &ClientConfig) -> Clients {
    let sdk_config = load_sdk_config(config).await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
    if let Some(ref endpoint) = config.endpoint_url {
        // S3-compatible providers are addressed path-style: {endpoint}/{bucket}/{key}
        s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
    }
    let s3 = aws_sdk_s3::Client::from_conf(s3_config.build());
    let cloudfront = aws_sdk_cloudfront::Client::new(&sdk_config);

    tracing::debug!(
        region = ?sdk_config.region().map(|r| r.to_string()),
        endpoint = ?config.endpoint_url,
        profile = ?config.credentials.as_ref().and_then(|c| c.profile_name()),
        "AWS clients created"
    );

    Clients {
        store: Arc::new(S3ObjectStore::new(s3)),
        invalidator: Arc::new(CloudFrontInvalidator::new(cloudfront)),
    }
}
