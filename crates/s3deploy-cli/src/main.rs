//! s3deploy CLI: upload the changed files of a local directory to an S3 bucket, then
//! optionally invalidate a CloudFront distribution.
//!
//! Environment: S3DEPLOY_RETRY_DELAY_MS, S3_ENDPOINT, S3_REGION (or AWS_REGION), RUST_LOG.

use anyhow::Context;
use clap::Parser;
use s3deploy_cli::{error_line, init_tracing, success_line, DeployArgs, UploadProgressBar};
use s3deploy_core::{ClientConfig, DeployConfig, DeploymentResult};
use s3deploy_engine::{Deployer, RetryPolicy};
use s3deploy_storage::create_clients;
use std::process::ExitCode;
use std::sync::Arc;

fn print_json(result: &DeploymentResult) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(result)?;
    println!("{}", out);
    Ok(())
}

async fn run(args: DeployArgs) -> anyhow::Result<()> {
    let json = args.json;
    let config = DeployConfig::from_env().context("Failed to load configuration")?;
    let request = args.into_request()?;
    let client_config = ClientConfig::for_request(&request, &config);
    tracing::debug!(
        bucket = %request.bucket,
        path = %request.source_dir.display(),
        region = ?client_config.region,
        endpoint = ?client_config.endpoint_url,
        retry_delay_ms = config.retry_delay_ms,
        "Resolved deployment settings"
    );
    let clients = create_clients(&client_config).await;

    let progress = if json {
        UploadProgressBar::hidden()
    } else {
        UploadProgressBar::new()
    };

    let deployer = Deployer::new(clients.store)
        .with_invalidator(clients.invalidator)
        .with_progress(Arc::new(progress))
        .with_retry_policy(RetryPolicy::with_base_delay(config.retry_delay()));

    let result = deployer.deploy(&request).await?;

    if json {
        print_json(&result)?;
    } else {
        println!("{}", success_line(&result.message));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = DeployArgs::parse();
    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}
