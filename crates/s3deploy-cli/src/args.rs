//! Command-line arguments

use clap::Parser;
use s3deploy_core::{Credentials, DeployError, DeploymentRequest};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "s3deploy",
    version,
    about = "Upload changed files from a directory to an S3 bucket"
)]
pub struct DeployArgs {
    /// Directory to upload
    #[arg(short, long)]
    pub path: PathBuf,

    /// Destination bucket name
    #[arg(short, long)]
    pub bucket: String,

    /// CloudFront distribution to invalidate after the upload
    #[arg(short, long)]
    pub distribution: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long)]
    pub profile: Option<String>,

    /// AWS access key ID (requires --access-key)
    #[arg(short = 'i', long)]
    pub key_id: Option<String>,

    /// AWS secret access key (requires --key-id)
    #[arg(short = 'k', long)]
    pub access_key: Option<String>,

    /// AWS region of the bucket
    #[arg(long)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible providers
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Re-upload every file, bypassing change detection
    #[arg(short, long)]
    pub reupload: bool,

    /// Log each successful upload
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the deployment result as JSON
    #[arg(long)]
    pub json: bool,
}

impl DeployArgs {
    /// Validate the arguments into a deployment request.
    pub fn into_request(self) -> Result<DeploymentRequest, DeployError> {
        let credentials = Credentials::from_parts(self.profile, self.key_id, self.access_key)?;

        let mut request = DeploymentRequest::new(&self.path, self.bucket)
            .map_err(|e| DeployError::io(&self.path, e))?;
        request.credentials = credentials;
        request.region = self.region;
        request.endpoint_url = self.endpoint_url;
        request.distribution_id = self.distribution;
        request.reupload_all = self.reupload;
        request.verbose = self.verbose;

        Ok(request)
    }
}
