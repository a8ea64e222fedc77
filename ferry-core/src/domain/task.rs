//! Task identity and handle types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every container launched by Ferry
pub const CONTAINER_NAME_PREFIX: &str = "ferry-task";

/// Identifies one unit of work within one workflow execution
///
/// All artifact names and the container name are derived from the identity,
/// so the uploader and the remote worker agree on locations without any
/// coordination beyond sharing this pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskIdentity {
    pub dispatch_id: String,
    pub node_id: i64,
}

impl TaskIdentity {
    pub fn new(dispatch_id: impl Into<String>, node_id: i64) -> Self {
        Self {
            dispatch_id: dispatch_id.into(),
            node_id,
        }
    }

    /// Creates an identity with a freshly generated dispatch ID
    pub fn generate(node_id: i64) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), node_id)
    }

    /// Tag shared by all names derived from this identity
    pub fn image_tag(&self) -> String {
        format!("{}-{}", self.dispatch_id, self.node_id)
    }

    /// Name of the single container in the task definition
    pub fn container_name(&self) -> String {
        format!("{}-{}", CONTAINER_NAME_PREFIX, self.image_tag())
    }

    /// Object key of the serialized call
    pub fn call_artifact_key(&self) -> String {
        format!("func-{}.json", self.image_tag())
    }

    /// Object key the remote worker writes its return value to
    pub fn result_artifact_key(&self) -> String {
        format!("result-{}.json", self.image_tag())
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dispatch_id, self.node_id)
    }
}

/// Task metadata handed over by the orchestrator with every call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub dispatch_id: String,
    pub node_id: i64,
}

impl From<&TaskMetadata> for TaskIdentity {
    fn from(meta: &TaskMetadata) -> Self {
        TaskIdentity::new(meta.dispatch_id.clone(), meta.node_id)
    }
}

/// Opaque identifier of one launched task instance (a task ARN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short task ID: the last `/`-separated segment of the handle
    pub fn task_id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved caller identity of the account tasks run under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    pub account_id: String,
    pub caller_arn: Option<String>,
}

impl AccountContext {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            caller_arn: None,
        }
    }

    /// Full ARN of an IAM role in this account
    pub fn role_arn(&self, role_name: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", self.account_id, role_name)
    }
}
