//! Ferry Service Client
//!
//! A thin, type-safe facade over the remote services the Ferry executor
//! talks to: the object store, the container service, the log service and
//! the identity service.
//!
//! Every service client is built from one shared [`SdkConfig`], so requests
//! are signed with the credentials the default provider chain resolves.
//! An endpoint override sends every service to one base URL (an emulator
//! such as LocalStack); objects are then addressed path-style.
//!
//! # Example
//!
//! ```no_run
//! use ferry_client::AwsClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AwsClient::load("us-east-1", Some("http://localhost:4566")).await;
//!
//!     let identity = client.get_caller_identity().await?;
//!     println!("Running as account {:?}", identity.into_account());
//!     Ok(())
//! }
//! ```

pub mod error;
mod ecs;
mod logs;
mod s3;
mod sts;

// Re-export commonly used types
pub use aws_config::SdkConfig;
pub use aws_sdk_sts::config::Credentials;
pub use error::{ClientError, Result};

use aws_config::{BehaviorVersion, ConfigLoader, Region};
use tracing::debug;

/// Client for the remote services
///
/// This client provides methods for every remote operation the executor
/// needs, organized into logical groups:
/// - Object storage (put, get)
/// - Container service (register, run, list, describe, stop)
/// - Log retrieval
/// - Caller identity
#[derive(Debug, Clone)]
pub struct AwsClient {
    s3: aws_sdk_s3::Client,
    ecs: aws_sdk_ecs::Client,
    logs: aws_sdk_cloudwatchlogs::Client,
    sts: aws_sdk_sts::Client,
}

impl AwsClient {
    /// Configuration loader for `region`, optionally pinned to one endpoint
    ///
    /// Credentials, retries and timeouts come from the default chain; use the
    /// returned loader to override any of them before calling `load`.
    ///
    /// # Arguments
    /// * `region` - Region the requests are signed for
    /// * `endpoint_url` - Base URL for every service (e.g., "http://localhost:4566")
    pub fn loader(region: impl Into<String>, endpoint_url: Option<&str>) -> ConfigLoader {
        let loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.into()));

        match endpoint_url {
            Some(url) => loader.endpoint_url(url.trim_end_matches('/')),
            None => loader,
        }
    }

    /// Load the shared configuration and build every service client from it
    pub async fn load(region: impl Into<String>, endpoint_url: Option<&str>) -> Self {
        let config = Self::loader(region, endpoint_url).load().await;
        Self::from_conf(&config)
    }

    /// Build every service client from an already loaded configuration
    pub fn from_conf(config: &SdkConfig) -> Self {
        let mut s3 = aws_sdk_s3::config::Builder::from(config);
        if let Some(url) = config.endpoint_url() {
            debug!("Routing every service to {}", url);
            // Emulators do not resolve virtual-hosted bucket names
            s3 = s3.force_path_style(true);
        }

        Self {
            s3: aws_sdk_s3::Client::from_conf(s3.build()),
            ecs: aws_sdk_ecs::Client::new(config),
            logs: aws_sdk_cloudwatchlogs::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// `Authorization` header of a request signed with [`credentials`]
    pub const SIGNED: &str = "^AWS4-HMAC-SHA256 Credential=AKIDFERRYTEST/";

    pub fn credentials() -> Credentials {
        Credentials::new("AKIDFERRYTEST", "ferry-test-secret", None, None, "ferry-tests")
    }

    /// Client signing with static credentials against `url`
    pub async fn client(url: &str) -> AwsClient {
        let config = AwsClient::loader("us-east-1", Some(url))
            .credentials_provider(credentials())
            .load()
            .await;
        AwsClient::from_conf(&config)
    }
}
