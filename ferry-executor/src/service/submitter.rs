//! Task submitter
//!
//! Registers a task definition and launches exactly one task from it.

use ferry_core::domain::definition::TaskDefinition;
use ferry_core::domain::task::{AccountContext, TaskHandle, TaskIdentity};
use ferry_core::dto::ecs::{RegisterTaskDefinitionRequest, RunTaskRequest};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::validate_network_ids;
use crate::error::{ExecutorError, Result};
use crate::repository::ExecutionService;

/// Submits task definitions to the container service
pub struct TaskSubmitter {
    service: Arc<dyn ExecutionService>,
    cluster: String,
}

impl TaskSubmitter {
    pub fn new(service: Arc<dyn ExecutionService>, cluster: impl Into<String>) -> Self {
        Self {
            service,
            cluster: cluster.into(),
        }
    }

    /// Registers `definition` and launches one task from the new revision
    ///
    /// The network placement is checked before any remote call. Rejections
    /// are not retried.
    ///
    /// # Arguments
    /// * `identity` - Identity the definition was built for, carried in errors
    /// * `definition` - Definition to register
    /// * `account` - Account the role ARNs are resolved in
    pub async fn submit(
        &self,
        identity: &TaskIdentity,
        definition: &TaskDefinition,
        account: &AccountContext,
    ) -> Result<TaskHandle> {
        validate_network_ids(
            &definition.network.subnets,
            &definition.network.security_groups,
        )?;

        let register = RegisterTaskDefinitionRequest::from_definition(definition, account);
        let revision = self
            .service
            .register_definition(&register)
            .await
            .map_err(|e| submission_error(identity, format!("registration rejected: {}", e)))?;
        debug!("Registered task definition {}", revision);

        let run = RunTaskRequest::for_definition(&self.cluster, &revision, definition);
        let handle = self
            .service
            .launch(&run)
            .await
            .map_err(|e| submission_error(identity, format!("launch rejected: {}", e)))?;

        info!("Launched task {} from {}", handle, revision);
        Ok(handle)
    }
}

fn submission_error(identity: &TaskIdentity, message: String) -> ExecutorError {
    ExecutorError::Submission {
        identity: identity.clone(),
        message,
    }
}
