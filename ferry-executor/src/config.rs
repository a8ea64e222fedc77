//! Executor configuration
//!
//! Defines every option the executor recognizes, with explicit defaults.
//! The configuration is read once and threaded into every call; nothing is
//! looked up from the process environment afterwards.

use ferry_core::domain::network::{is_valid_security_group_id, is_valid_subnet_id, split_ids};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ExecutorError, Result};

/// Executor configuration
///
/// Timeouts and intervals are configurable to allow tuning for different
/// deployment scenarios (short test tasks vs hours-long jobs).
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Region the tasks run in
    pub region: String,

    /// Single endpoint for all services (e.g. a LocalStack emulator)
    pub endpoint_url: Option<String>,

    /// Bucket holding call and result artifacts
    pub s3_bucket_name: String,

    /// Cluster tasks are launched on
    pub ecs_cluster_name: String,

    /// Task definition family for a user, project or experiment
    pub ecs_task_family_name: String,

    /// Role used by the platform agent
    pub ecs_task_execution_role_name: String,

    /// Role used by the code inside the container
    pub ecs_task_role_name: String,

    /// Subnets tasks are attached to
    pub ecs_task_subnet_ids: Vec<String>,

    /// Security groups attached to tasks
    pub ecs_task_security_group_ids: Vec<String>,

    /// Whether tasks get a public IP (public subnets)
    pub assign_public_ip: bool,

    /// Log group container output is written to
    pub ecs_task_log_group_name: String,

    /// Prefix of the per-task log streams
    pub log_stream_prefix: String,

    /// Image the task container runs
    pub container_image: String,

    /// vCPUs available to a task
    pub vcpu: f64,

    /// Memory (in GB) available to a task
    pub memory: f64,

    /// How often to poll a submitted task
    pub poll_freq: Duration,

    /// Maximum time to wait for a task to stop; `None` waits forever
    pub poll_timeout: Option<Duration>,

    /// Retries of a status query after a transient error
    pub status_retries: u32,

    /// Local staging directory for artifacts
    pub cache_dir: PathBuf,
}

impl ExecutorConfig {
    /// Creates configuration from environment variables
    ///
    /// Every variable is optional; unset or unparsable values keep their defaults.
    ///
    /// Recognized environment variables:
    /// - FERRY_REGION, FERRY_ENDPOINT_URL
    /// - FERRY_S3_BUCKET, FERRY_ECS_CLUSTER, FERRY_TASK_FAMILY
    /// - FERRY_EXECUTION_ROLE, FERRY_TASK_ROLE
    /// - FERRY_SUBNETS, FERRY_SECURITY_GROUPS (comma-separated)
    /// - FERRY_ASSIGN_PUBLIC_IP (true/false)
    /// - FERRY_LOG_GROUP, FERRY_LOG_STREAM_PREFIX
    /// - FERRY_IMAGE, FERRY_VCPU, FERRY_MEMORY
    /// - FERRY_POLL_FREQ, FERRY_POLL_TIMEOUT (seconds)
    /// - FERRY_STATUS_RETRIES, FERRY_CACHE_DIR
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            region: env_string("FERRY_REGION").unwrap_or(defaults.region),
            endpoint_url: env_string("FERRY_ENDPOINT_URL").or(defaults.endpoint_url),
            s3_bucket_name: env_string("FERRY_S3_BUCKET").unwrap_or(defaults.s3_bucket_name),
            ecs_cluster_name: env_string("FERRY_ECS_CLUSTER").unwrap_or(defaults.ecs_cluster_name),
            ecs_task_family_name: env_string("FERRY_TASK_FAMILY")
                .unwrap_or(defaults.ecs_task_family_name),
            ecs_task_execution_role_name: env_string("FERRY_EXECUTION_ROLE")
                .unwrap_or(defaults.ecs_task_execution_role_name),
            ecs_task_role_name: env_string("FERRY_TASK_ROLE").unwrap_or(defaults.ecs_task_role_name),
            ecs_task_subnet_ids: env_string("FERRY_SUBNETS")
                .map(|s| split_ids(&s))
                .unwrap_or(defaults.ecs_task_subnet_ids),
            ecs_task_security_group_ids: env_string("FERRY_SECURITY_GROUPS")
                .map(|s| split_ids(&s))
                .unwrap_or(defaults.ecs_task_security_group_ids),
            assign_public_ip: env_parse("FERRY_ASSIGN_PUBLIC_IP")
                .unwrap_or(defaults.assign_public_ip),
            ecs_task_log_group_name: env_string("FERRY_LOG_GROUP")
                .unwrap_or(defaults.ecs_task_log_group_name),
            log_stream_prefix: env_string("FERRY_LOG_STREAM_PREFIX")
                .unwrap_or(defaults.log_stream_prefix),
            container_image: env_string("FERRY_IMAGE").unwrap_or(defaults.container_image),
            vcpu: env_parse("FERRY_VCPU").unwrap_or(defaults.vcpu),
            memory: env_parse("FERRY_MEMORY").unwrap_or(defaults.memory),
            poll_freq: env_parse::<u64>("FERRY_POLL_FREQ")
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_freq),
            poll_timeout: env_parse::<u64>("FERRY_POLL_TIMEOUT")
                .map(Duration::from_secs)
                .or(defaults.poll_timeout),
            status_retries: env_parse("FERRY_STATUS_RETRIES").unwrap_or(defaults.status_retries),
            cache_dir: env_string("FERRY_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
        }
    }

    /// Sets the subnets tasks are attached to
    pub fn with_subnets<I, S>(mut self, subnets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ecs_task_subnet_ids = subnets.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the security groups attached to tasks
    pub fn with_security_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ecs_task_security_group_ids = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the container image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.container_image = image.into();
        self
    }

    /// Sets the poll frequency
    pub fn with_poll_freq(mut self, poll_freq: Duration) -> Self {
        self.poll_freq = poll_freq;
        self
    }

    /// Bounds the time spent waiting for a task to stop
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }

    /// Sets the local staging directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("region", &self.region),
            ("s3_bucket_name", &self.s3_bucket_name),
            ("ecs_cluster_name", &self.ecs_cluster_name),
            ("ecs_task_family_name", &self.ecs_task_family_name),
            ("ecs_task_execution_role_name", &self.ecs_task_execution_role_name),
            ("ecs_task_role_name", &self.ecs_task_role_name),
            ("ecs_task_log_group_name", &self.ecs_task_log_group_name),
            ("container_image", &self.container_image),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(config_error(format!("{} cannot be empty", name)));
            }
        }

        if self.poll_freq.is_zero() {
            return Err(config_error("poll_freq must be greater than 0"));
        }

        if !(self.vcpu > 0.0) || !(self.memory > 0.0) {
            return Err(config_error("vcpu and memory must be greater than 0"));
        }

        if let Some(url) = &self.endpoint_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(config_error("endpoint_url must start with http:// or https://"));
            }
        }

        self.validate_network()
    }

    /// Validates subnet and security group identifiers
    ///
    /// Checks shape only; it cannot tell whether the resources exist.
    pub fn validate_network(&self) -> Result<()> {
        validate_network_ids(&self.ecs_task_subnet_ids, &self.ecs_task_security_group_ids)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
            s3_bucket_name: "ferry-task-resources".to_string(),
            ecs_cluster_name: "ferry-cluster".to_string(),
            ecs_task_family_name: "ferry-tasks".to_string(),
            ecs_task_execution_role_name: "ecsTaskExecutionRole".to_string(),
            ecs_task_role_name: "FerryTaskRole".to_string(),
            ecs_task_subnet_ids: Vec::new(),
            ecs_task_security_group_ids: Vec::new(),
            assign_public_ip: true,
            ecs_task_log_group_name: "ferry-task-logs".to_string(),
            log_stream_prefix: "ferry".to_string(),
            container_image: "ferry-task-images:latest".to_string(),
            vcpu: 0.25,
            memory: 0.5,
            poll_freq: Duration::from_secs(10),
            poll_timeout: None,
            status_retries: 3,
            cache_dir: PathBuf::from("/tmp/ferry"),
        }
    }
}

/// Checks every subnet and security group identifier
///
/// An empty security group list is allowed (the platform default applies);
/// at least one subnet is required for placement.
pub fn validate_network_ids(subnets: &[String], security_groups: &[String]) -> Result<()> {
    if subnets.is_empty() {
        return Err(config_error("at least one subnet ID is required"));
    }

    if let Some(bad) = subnets.iter().find(|id| !is_valid_subnet_id(id)) {
        return Err(config_error(format!("{} is not a valid subnet ID", bad)));
    }

    if let Some(bad) = security_groups
        .iter()
        .find(|id| !is_valid_security_group_id(id))
    {
        return Err(config_error(format!(
            "{} is not a valid security group ID",
            bad
        )));
    }

    Ok(())
}

fn config_error(message: impl Into<String>) -> ExecutorError {
    ExecutorError::Configuration(message.into())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ExecutorConfig {
        ExecutorConfig::default()
            .with_subnets(["subnet-871545e1"])
            .with_security_groups(["sg-0043541a"])
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.poll_freq, Duration::from_secs(10));
        assert_eq!(config.poll_timeout, None);
        assert_eq!(config.status_retries, 3);
        assert_eq!(config.vcpu, 0.25);
        assert_eq!(config.memory, 0.5);
        assert!(config.assign_public_ip);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/ferry"));
    }

    #[test]
    fn test_default_config_needs_network() {
        let err = ExecutorConfig::default().validate().unwrap_err();
        assert!(matches!(err, ExecutorError::Configuration(_)));
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();

        config.s3_bucket_name = String::new();
        assert!(config.validate().is_err());
        config.s3_bucket_name = "bucket".to_string();

        config.poll_freq = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_freq = Duration::from_secs(1);

        config.memory = 0.0;
        assert!(config.validate().is_err());
        config.memory = 1.0;

        config.endpoint_url = Some("localhost:4566".to_string());
        assert!(config.validate().is_err());
        config.endpoint_url = Some("http://localhost:4566".to_string());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_network_validation() {
        let short_subnet = valid_config().with_subnets(["subnet-871545e"]);
        assert!(matches!(
            short_subnet.validate_network(),
            Err(ExecutorError::Configuration(_))
        ));

        let bad_group = valid_config().with_security_groups(["sg-0043541"]);
        assert!(bad_group.validate_network().is_err());

        let no_groups = valid_config().with_security_groups(Vec::<String>::new());
        assert!(no_groups.validate_network().is_ok());

        let several = valid_config().with_subnets(["subnet-871545e1", "subnet-0a1b2c3d"]);
        assert!(several.validate_network().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        // No other test reads these variables
        unsafe {
            std::env::set_var("FERRY_S3_BUCKET", "env-bucket");
            std::env::set_var("FERRY_SUBNETS", "subnet-871545e1, subnet-0a1b2c3d");
            std::env::set_var("FERRY_POLL_FREQ", "30");
            std::env::set_var("FERRY_ASSIGN_PUBLIC_IP", "false");
            std::env::set_var("FERRY_VCPU", "not-a-number");
        }

        let config = ExecutorConfig::from_env();

        unsafe {
            for key in [
                "FERRY_S3_BUCKET",
                "FERRY_SUBNETS",
                "FERRY_POLL_FREQ",
                "FERRY_ASSIGN_PUBLIC_IP",
                "FERRY_VCPU",
            ] {
                std::env::remove_var(key);
            }
        }

        assert_eq!(config.s3_bucket_name, "env-bucket");
        assert_eq!(
            config.ecs_task_subnet_ids,
            vec!["subnet-871545e1".to_string(), "subnet-0a1b2c3d".to_string()]
        );
        assert_eq!(config.poll_freq, Duration::from_secs(30));
        assert!(!config.assign_public_ip);
        assert_eq!(config.vcpu, 0.25);
    }

    #[test]
    fn test_builders() {
        let config = valid_config()
            .with_image("repo/image:tag")
            .with_poll_freq(Duration::from_secs(30))
            .with_poll_timeout(Duration::from_secs(3600))
            .with_cache_dir("/var/tmp/ferry");

        assert_eq!(config.container_image, "repo/image:tag");
        assert_eq!(config.poll_freq, Duration::from_secs(30));
        assert_eq!(config.poll_timeout, Some(Duration::from_secs(3600)));
        assert_eq!(config.cache_dir, PathBuf::from("/var/tmp/ferry"));
    }
}
