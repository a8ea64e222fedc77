//! Execution repository
//!
//! Handles communication with the container service:
//! - Registering task definitions
//! - Launching tasks
//! - Listing and describing stopped tasks
//! - Stopping tasks

use async_trait::async_trait;
use ferry_client::{AwsClient, ClientError, Result};
use ferry_core::domain::status::{LastStatus, TaskState};
use ferry_core::domain::task::TaskHandle;
use ferry_core::dto::ecs::{
    DESIRED_STATUS_STOPPED, DescribeTasksRequest, ListTasksRequest, RegisterTaskDefinitionRequest,
    RunTaskRequest, StopTaskRequest, Task,
};
use std::sync::Arc;

/// One page of task handles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPage {
    pub handles: Vec<TaskHandle>,
    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

/// What the container service reports about one task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescription {
    pub handle: TaskHandle,
    pub last_status: Option<LastStatus>,
    /// Exit code of the first container
    pub exit_code: Option<i32>,
}

impl TaskDescription {
    /// Collapsed lifecycle state of the described task
    pub fn state(&self) -> TaskState {
        match &self.last_status {
            Some(status) => status.classify(self.exit_code),
            None => TaskState::InProgress,
        }
    }
}

impl From<Task> for TaskDescription {
    fn from(task: Task) -> Self {
        Self {
            exit_code: task.exit_code(),
            last_status: task.last_status.as_deref().map(LastStatus::parse),
            handle: TaskHandle::new(task.task_arn),
        }
    }
}

/// Repository trait for task lifecycle operations
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Registers a task definition
    ///
    /// # Returns
    /// The `family:revision` reference of the new revision
    async fn register_definition(&self, req: &RegisterTaskDefinitionRequest) -> Result<String>;

    /// Launches one task
    ///
    /// # Returns
    /// The handle of the launched task; a rejection is a client error
    async fn launch(&self, req: &RunTaskRequest) -> Result<TaskHandle>;

    /// Lists one page of stopped tasks of `family`
    async fn list_stopped(
        &self,
        cluster: &str,
        family: &str,
        next_token: Option<String>,
    ) -> Result<TaskPage>;

    /// Describes the given tasks
    async fn describe(&self, cluster: &str, handles: &[TaskHandle]) -> Result<Vec<TaskDescription>>;

    /// Requests that a task stop
    async fn stop(&self, cluster: &str, handle: &TaskHandle, reason: &str) -> Result<()>;
}

/// SDK-backed implementation of ExecutionService
pub struct HttpExecutionService {
    client: Arc<AwsClient>,
}

impl HttpExecutionService {
    pub fn new(client: Arc<AwsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExecutionService for HttpExecutionService {
    async fn register_definition(&self, req: &RegisterTaskDefinitionRequest) -> Result<String> {
        let resp = self.client.register_task_definition(req).await?;
        Ok(resp.task_definition.revision_ref())
    }

    async fn launch(&self, req: &RunTaskRequest) -> Result<TaskHandle> {
        let resp = self.client.run_task(req).await?;

        if let Some(task) = resp.tasks.into_iter().next() {
            return Ok(TaskHandle::new(task.task_arn));
        }

        let message = if resp.failures.is_empty() {
            "launch returned no tasks".to_string()
        } else {
            resp.failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        };
        Err(ClientError::InvalidRequest(message))
    }

    async fn list_stopped(
        &self,
        cluster: &str,
        family: &str,
        next_token: Option<String>,
    ) -> Result<TaskPage> {
        let req = ListTasksRequest {
            cluster: cluster.to_string(),
            family: family.to_string(),
            desired_status: DESIRED_STATUS_STOPPED.to_string(),
            next_token,
        };
        let resp = self.client.list_tasks(&req).await?;

        Ok(TaskPage {
            handles: resp.task_arns.into_iter().map(TaskHandle::new).collect(),
            next_token: resp.next_token,
        })
    }

    async fn describe(&self, cluster: &str, handles: &[TaskHandle]) -> Result<Vec<TaskDescription>> {
        if handles.is_empty() {
            return Ok(Vec::new());
        }

        let req = DescribeTasksRequest {
            cluster: cluster.to_string(),
            tasks: handles.iter().map(|h| h.as_str().to_string()).collect(),
        };
        let resp = self.client.describe_tasks(&req).await?;

        Ok(resp.tasks.into_iter().map(TaskDescription::from).collect())
    }

    async fn stop(&self, cluster: &str, handle: &TaskHandle, reason: &str) -> Result<()> {
        let req = StopTaskRequest {
            cluster: cluster.to_string(),
            task: handle.as_str().to_string(),
            reason: reason.to_string(),
        };
        self.client.stop_task(&req).await
    }
}
