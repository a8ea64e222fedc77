//! Configuration module
//!
//! Layers command-line flags over the environment-derived executor
//! configuration.

use anyhow::{Result, bail};
use ferry_executor::ExecutorConfig;
use std::time::Duration;

/// Values given on the command line; `None` keeps the environment's value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub bucket: Option<String>,
    pub cluster: Option<String>,
    pub family: Option<String>,
    pub image: Option<String>,
    pub poll_freq: Option<u64>,
}

impl Overrides {
    /// Reads the environment and applies the overrides on top
    pub fn load(self) -> Result<ExecutorConfig> {
        self.apply(ExecutorConfig::from_env())
    }

    /// Applies the overrides to `config`
    pub fn apply(self, mut config: ExecutorConfig) -> Result<ExecutorConfig> {
        if let Some(region) = self.region {
            config.region = region;
        }
        if let Some(url) = self.endpoint_url {
            config.endpoint_url = Some(url);
        }
        if let Some(bucket) = self.bucket {
            config.s3_bucket_name = bucket;
        }
        if let Some(cluster) = self.cluster {
            config.ecs_cluster_name = cluster;
        }
        if let Some(family) = self.family {
            config.ecs_task_family_name = family;
        }
        if let Some(image) = self.image {
            config.container_image = image;
        }
        if let Some(secs) = self.poll_freq {
            if secs == 0 {
                bail!("--poll-freq must be at least 1 second");
            }
            config.poll_freq = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
