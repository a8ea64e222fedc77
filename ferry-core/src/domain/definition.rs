//! Task definition domain types
//!
//! A [`TaskDefinition`] is the declarative description of one remote unit of
//! work. It is registered with the container service right before launch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::task::TaskHandle;

/// Environment variable holding the call artifact location
pub const ENV_CALL_URI: &str = "FERRY_CALL_URI";
/// Environment variable holding the result artifact location
pub const ENV_RESULT_URI: &str = "FERRY_RESULT_URI";
/// Environment variable holding the dispatch ID
pub const ENV_DISPATCH_ID: &str = "FERRY_DISPATCH_ID";
/// Environment variable holding the node ID
pub const ENV_NODE_ID: &str = "FERRY_NODE_ID";

/// Declarative description of a remote task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Logical grouping; re-registering a family creates a new revision
    pub family: String,
    pub container_name: String,
    pub image: String,
    /// CPU units (1024 per vCPU)
    pub cpu_units: u32,
    /// Memory in MiB
    pub memory_mib: u32,
    /// Role used by the platform agent (pulls image, writes logs)
    pub execution_role_name: String,
    /// Role used by the code running inside the container
    pub task_role_name: String,
    pub network: NetworkPlacement,
    pub log: LogDestination,
    /// Ordered so equal inputs serialize identically
    pub environment: BTreeMap<String, String>,
}

/// Where the task is attached in the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPlacement {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    /// Needed when the subnets route through an internet gateway
    pub assign_public_ip: bool,
}

/// Log destination for the container's stdout/stderr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDestination {
    pub group: String,
    pub region: String,
    pub stream_prefix: String,
}

impl LogDestination {
    /// Stream name the log driver assigns to a container of a task
    pub fn stream_name(&self, container_name: &str, handle: &TaskHandle) -> String {
        format!(
            "{}/{}/{}",
            self.stream_prefix,
            container_name,
            handle.task_id()
        )
    }
}

/// Converts a fractional resource amount (vCPUs, GB) into platform units
pub fn to_units(amount: f64) -> u32 {
    (amount * 1024.0) as u32
}

/// Object-store URI of an artifact
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}
