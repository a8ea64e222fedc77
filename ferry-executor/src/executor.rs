//! Remote executor
//!
//! Drives one unit of work through its whole remote lifecycle:
//! upload → submit → poll → fetch. Each call to [`RemoteExecutor::run`] is
//! an independent flow; the executor itself holds no per-run state and can
//! be shared across concurrently running flows.

use ferry_client::AwsClient;
use ferry_core::domain::call::TaskCall;
use ferry_core::domain::definition::LogDestination;
use ferry_core::domain::status::TaskState;
use ferry_core::domain::task::{TaskHandle, TaskIdentity, TaskMetadata};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ExecutorConfig;
use crate::error::{ExecutorError, Result};
use crate::repository::{
    ExecutionService, HttpExecutionService, HttpIdentityService, HttpLogService, HttpObjectStore,
    IdentityService, LogService, ObjectStore,
};
use crate::scheduler::StatusPoller;
use crate::service::{
    ArtifactStore, DEFAULT_CANCEL_REASON, ResultRetriever, TaskSubmitter, build_definition,
    cancel_task,
};

/// The remote services an executor talks to
#[derive(Clone)]
pub struct Ports {
    pub objects: Arc<dyn ObjectStore>,
    pub execution: Arc<dyn ExecutionService>,
    pub logs: Arc<dyn LogService>,
    pub identity: Arc<dyn IdentityService>,
}

impl Ports {
    /// Service-backed ports sharing one client
    pub fn http(client: Arc<AwsClient>) -> Self {
        Self {
            objects: Arc::new(HttpObjectStore::new(client.clone())),
            execution: Arc::new(HttpExecutionService::new(client.clone())),
            logs: Arc::new(HttpLogService::new(client.clone())),
            identity: Arc::new(HttpIdentityService::new(client)),
        }
    }
}

/// What a successful run hands back
#[derive(Debug, Clone)]
pub struct TaskOutput<T> {
    /// Deserialized return value of the remote function
    pub value: T,
    /// Captured container output; empty when unavailable
    pub logs: String,
    /// Handle of the task that produced the value
    pub handle: TaskHandle,
}

/// Executes function calls as remote container tasks
pub struct RemoteExecutor {
    config: ExecutorConfig,
    execution: Arc<dyn ExecutionService>,
    identity: Arc<dyn IdentityService>,
    artifacts: Arc<ArtifactStore>,
    submitter: TaskSubmitter,
    poller: StatusPoller,
    retriever: ResultRetriever,
}

impl RemoteExecutor {
    /// Creates an executor talking to the services named in `config`
    ///
    /// Credentials are resolved by the default provider chain; the region and
    /// the optional endpoint override come from `config`.
    pub async fn new(config: ExecutorConfig) -> Self {
        let client = AwsClient::load(&config.region, config.endpoint_url.as_deref()).await;
        Self::with_ports(config, Ports::http(Arc::new(client)))
    }

    /// Creates an executor over the given ports
    pub fn with_ports(config: ExecutorConfig, ports: Ports) -> Self {
        let artifacts = Arc::new(ArtifactStore::new(
            ports.objects,
            &config.s3_bucket_name,
            &config.cache_dir,
        ));
        let destination = LogDestination {
            group: config.ecs_task_log_group_name.clone(),
            region: config.region.clone(),
            stream_prefix: config.log_stream_prefix.clone(),
        };

        Self {
            submitter: TaskSubmitter::new(ports.execution.clone(), &config.ecs_cluster_name),
            poller: StatusPoller::new(ports.execution.clone(), &config),
            retriever: ResultRetriever::new(artifacts.clone(), ports.logs, destination),
            execution: ports.execution,
            identity: ports.identity,
            artifacts,
            config,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs `call` remotely and returns its result
    ///
    /// The steps run strictly in order and the first failure aborts the run.
    /// A task that stops with a non-zero exit code yields
    /// [`ExecutorError::RemoteTaskFailed`] and its result is never fetched.
    pub async fn run<T: DeserializeOwned + Send + 'static>(
        &self,
        call: &TaskCall,
        metadata: &TaskMetadata,
    ) -> Result<TaskOutput<T>> {
        let identity = TaskIdentity::from(metadata);
        info!("[{}] Running {} remotely", identity, call.function);

        self.config.validate()?;

        let account = self
            .identity
            .caller_identity()
            .await
            .map_err(|e| ExecutorError::Authentication {
                identity: identity.clone(),
                message: e.to_string(),
            })?;
        debug!("[{}] Acting as account {}", identity, account.account_id);

        self.artifacts.upload_call(&identity, call).await?;

        let definition = build_definition(&identity, &self.config);
        let handle = self
            .submitter
            .submit(&identity, &definition, &account)
            .await?;
        info!("[{}] Submitted as {}", identity, handle);

        let exit_code = self.poller.wait(&identity, &handle).await?;
        if exit_code != 0 {
            warn!("[{}] Task {} failed with exit code {}", identity, handle, exit_code);
            return Err(ExecutorError::RemoteTaskFailed {
                identity,
                handle,
                exit_code,
            });
        }

        let value = self.retriever.fetch(&identity, &handle).await?;
        let logs = self.retriever.fetch_logs(&identity, &handle).await;

        info!("[{}] Completed", identity);
        Ok(TaskOutput {
            value,
            logs,
            handle,
        })
    }

    /// Requests that a task stop; `None` sends the default reason
    pub async fn cancel(&self, handle: &TaskHandle, reason: Option<&str>) -> Result<()> {
        cancel_task(
            self.execution.as_ref(),
            &self.config.ecs_cluster_name,
            handle,
            reason.unwrap_or(DEFAULT_CANCEL_REASON),
        )
        .await
    }

    /// Classifies the current state of a task with a single query
    pub async fn status(&self, identity: &TaskIdentity, handle: &TaskHandle) -> Result<TaskState> {
        self.poller.query(identity, handle).await
    }

    /// Reads the log output of a task; empty when unavailable
    pub async fn logs(&self, identity: &TaskIdentity, handle: &TaskHandle) -> String {
        self.retriever.fetch_logs(identity, handle).await
    }
}
