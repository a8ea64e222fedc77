//! Container service DTOs
//!
//! Request and response bodies for the task-definition, run, list,
//! describe and stop operations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::definition::TaskDefinition;
use crate::domain::task::AccountContext;

/// Launch type used for every task
pub const LAUNCH_TYPE_FARGATE: &str = "FARGATE";
/// Network mode required by the Fargate launch type
pub const NETWORK_MODE_AWSVPC: &str = "awsvpc";
/// Desired-status filter used when scanning for finished tasks
pub const DESIRED_STATUS_STOPPED: &str = "STOPPED";

// =============================================================================
// Task Definitions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTaskDefinitionRequest {
    pub family: String,
    pub task_role_arn: String,
    pub execution_role_arn: String,
    pub network_mode: String,
    pub requires_compatibilities: Vec<String>,
    pub container_definitions: Vec<ContainerDefinition>,
    pub cpu: String,
    pub memory: String,
}

impl RegisterTaskDefinitionRequest {
    /// Builds the registration body, resolving role names to ARNs in `account`
    pub fn from_definition(definition: &TaskDefinition, account: &AccountContext) -> Self {
        let mut options = HashMap::new();
        options.insert("awslogs-region".to_string(), definition.log.region.clone());
        options.insert("awslogs-group".to_string(), definition.log.group.clone());
        options.insert("awslogs-create-group".to_string(), "true".to_string());
        options.insert(
            "awslogs-stream-prefix".to_string(),
            definition.log.stream_prefix.clone(),
        );

        let environment = definition
            .environment
            .iter()
            .map(|(name, value)| KeyValuePair {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        Self {
            family: definition.family.clone(),
            task_role_arn: account.role_arn(&definition.task_role_name),
            execution_role_arn: account.role_arn(&definition.execution_role_name),
            network_mode: NETWORK_MODE_AWSVPC.to_string(),
            requires_compatibilities: vec![LAUNCH_TYPE_FARGATE.to_string()],
            container_definitions: vec![ContainerDefinition {
                name: definition.container_name.clone(),
                image: definition.image.clone(),
                essential: true,
                environment,
                log_configuration: LogConfiguration {
                    log_driver: "awslogs".to_string(),
                    options,
                },
            }],
            cpu: definition.cpu_units.to_string(),
            memory: definition.memory_mib.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub essential: bool,
    #[serde(default)]
    pub environment: Vec<KeyValuePair>,
    pub log_configuration: LogConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfiguration {
    pub log_driver: String,
    pub options: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTaskDefinitionResponse {
    pub task_definition: RegisteredTaskDefinition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredTaskDefinition {
    pub task_definition_arn: String,
    pub family: String,
    pub revision: u32,
}

impl RegisteredTaskDefinition {
    /// `family:revision` reference pinning the exact revision
    pub fn revision_ref(&self) -> String {
        format!("{}:{}", self.family, self.revision)
    }
}

// =============================================================================
// Run / Stop
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskRequest {
    pub cluster: String,
    pub task_definition: String,
    pub launch_type: String,
    pub count: u32,
    pub network_configuration: NetworkConfiguration,
}

impl RunTaskRequest {
    /// Launches exactly one task of `task_definition` with the definition's network placement
    pub fn for_definition(
        cluster: &str,
        task_definition: &str,
        definition: &TaskDefinition,
    ) -> Self {
        Self {
            cluster: cluster.to_string(),
            task_definition: task_definition.to_string(),
            launch_type: LAUNCH_TYPE_FARGATE.to_string(),
            count: 1,
            network_configuration: NetworkConfiguration {
                awsvpc_configuration: AwsVpcConfiguration {
                    subnets: definition.network.subnets.clone(),
                    security_groups: definition.network.security_groups.clone(),
                    assign_public_ip: if definition.network.assign_public_ip {
                        "ENABLED".to_string()
                    } else {
                        "DISABLED".to_string()
                    },
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    pub awsvpc_configuration: AwsVpcConfiguration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsVpcConfiguration {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTaskRequest {
    pub cluster: String,
    pub task: String,
    pub reason: String,
}

// =============================================================================
// List / Describe
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksRequest {
    pub cluster: String,
    pub family: String,
    pub desired_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksResponse {
    #[serde(default)]
    pub task_arns: Vec<String>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTasksRequest {
    pub cluster: String,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTasksResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

/// A task as described by the container service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_arn: String,
    pub last_status: Option<String>,
    pub desired_status: Option<String>,
    pub stopped_reason: Option<String>,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl Task {
    /// Exit code of the first container, if it ran far enough to have one
    pub fn exit_code(&self) -> Option<i32> {
        self.containers.first().and_then(|c| c.exit_code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: Option<String>,
    pub exit_code: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub arn: Option<String>,
    pub reason: Option<String>,
    pub detail: Option<String>,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.reason.as_deref().unwrap_or("unknown reason"),
            self.detail.as_deref().unwrap_or("no detail")
        )
    }
}
