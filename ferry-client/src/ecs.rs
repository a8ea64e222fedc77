//! Container service operations

use crate::AwsClient;
use crate::error::{ClientError, Result};
use aws_sdk_ecs::types as ecs;
use ferry_core::dto::ecs as dto;
use tracing::debug;

impl AwsClient {
    // =============================================================================
    // Task Definitions
    // =============================================================================

    /// Register a task definition
    ///
    /// Registering an existing family creates a new revision.
    ///
    /// # Returns
    /// The registered revision
    pub async fn register_task_definition(
        &self,
        req: &dto::RegisterTaskDefinitionRequest,
    ) -> Result<dto::RegisterTaskDefinitionResponse> {
        let containers = req
            .container_definitions
            .iter()
            .map(container_definition)
            .collect::<Result<Vec<_>>>()?;
        let compatibilities = req
            .requires_compatibilities
            .iter()
            .map(|c| ecs::Compatibility::from(c.as_str()))
            .collect();

        debug!("Registering task definition family {}", req.family);
        let resp = self
            .ecs
            .register_task_definition()
            .family(&req.family)
            .task_role_arn(&req.task_role_arn)
            .execution_role_arn(&req.execution_role_arn)
            .network_mode(ecs::NetworkMode::from(req.network_mode.as_str()))
            .set_requires_compatibilities(Some(compatibilities))
            .set_container_definitions(Some(containers))
            .cpu(&req.cpu)
            .memory(&req.memory)
            .send()
            .await
            .map_err(ClientError::from_sdk)?;

        let registered = resp.task_definition().ok_or_else(|| {
            ClientError::ParseError("registration returned no task definition".to_string())
        })?;

        Ok(dto::RegisterTaskDefinitionResponse {
            task_definition: dto::RegisteredTaskDefinition {
                task_definition_arn: registered
                    .task_definition_arn()
                    .unwrap_or_default()
                    .to_string(),
                family: registered.family().unwrap_or(req.family.as_str()).to_string(),
                revision: u32::try_from(registered.revision()).unwrap_or_default(),
            },
        })
    }

    // =============================================================================
    // Task Lifecycle
    // =============================================================================

    /// Run tasks from a registered task definition
    ///
    /// # Returns
    /// The launched tasks and any per-task placement failures
    pub async fn run_task(&self, req: &dto::RunTaskRequest) -> Result<dto::RunTaskResponse> {
        let vpc = &req.network_configuration.awsvpc_configuration;
        let awsvpc = ecs::AwsVpcConfiguration::builder()
            .set_subnets(Some(vpc.subnets.clone()))
            .set_security_groups(Some(vpc.security_groups.clone()))
            .assign_public_ip(ecs::AssignPublicIp::from(vpc.assign_public_ip.as_str()))
            .build()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        let count = i32::try_from(req.count)
            .map_err(|_| ClientError::InvalidRequest(format!("task count {} is too large", req.count)))?;

        debug!("Running {} task(s) of {}", req.count, req.task_definition);
        let resp = self
            .ecs
            .run_task()
            .cluster(&req.cluster)
            .task_definition(&req.task_definition)
            .launch_type(ecs::LaunchType::from(req.launch_type.as_str()))
            .count(count)
            .network_configuration(
                ecs::NetworkConfiguration::builder()
                    .awsvpc_configuration(awsvpc)
                    .build(),
            )
            .send()
            .await
            .map_err(ClientError::from_sdk)?;

        Ok(dto::RunTaskResponse {
            tasks: resp.tasks().iter().map(task).collect(),
            failures: resp.failures().iter().map(failure).collect(),
        })
    }

    /// Stop a running task
    ///
    /// The service acknowledges the request; the task stops asynchronously.
    pub async fn stop_task(&self, req: &dto::StopTaskRequest) -> Result<()> {
        self.ecs
            .stop_task()
            .cluster(&req.cluster)
            .task(&req.task)
            .reason(&req.reason)
            .send()
            .await
            .map_err(ClientError::from_sdk)?;
        Ok(())
    }

    // =============================================================================
    // Task Queries
    // =============================================================================

    /// List one page of task ARNs matching the request filters
    pub async fn list_tasks(&self, req: &dto::ListTasksRequest) -> Result<dto::ListTasksResponse> {
        let resp = self
            .ecs
            .list_tasks()
            .cluster(&req.cluster)
            .family(&req.family)
            .desired_status(ecs::DesiredStatus::from(req.desired_status.as_str()))
            .set_next_token(req.next_token.clone())
            .send()
            .await
            .map_err(ClientError::from_sdk)?;

        Ok(dto::ListTasksResponse {
            task_arns: resp.task_arns().to_vec(),
            next_token: resp.next_token().map(str::to_string),
        })
    }

    /// Describe tasks by ARN
    pub async fn describe_tasks(
        &self,
        req: &dto::DescribeTasksRequest,
    ) -> Result<dto::DescribeTasksResponse> {
        let resp = self
            .ecs
            .describe_tasks()
            .cluster(&req.cluster)
            .set_tasks(Some(req.tasks.clone()))
            .send()
            .await
            .map_err(ClientError::from_sdk)?;

        Ok(dto::DescribeTasksResponse {
            tasks: resp.tasks().iter().map(task).collect(),
            failures: resp.failures().iter().map(failure).collect(),
        })
    }
}

fn container_definition(container: &dto::ContainerDefinition) -> Result<ecs::ContainerDefinition> {
    let log_configuration = ecs::LogConfiguration::builder()
        .log_driver(ecs::LogDriver::from(
            container.log_configuration.log_driver.as_str(),
        ))
        .set_options(Some(container.log_configuration.options.clone()))
        .build()
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

    let environment = container
        .environment
        .iter()
        .map(|pair| {
            ecs::KeyValuePair::builder()
                .name(&pair.name)
                .value(&pair.value)
                .build()
        })
        .collect();

    Ok(ecs::ContainerDefinition::builder()
        .name(&container.name)
        .image(&container.image)
        .essential(container.essential)
        .set_environment(Some(environment))
        .log_configuration(log_configuration)
        .build())
}

fn task(task: &ecs::Task) -> dto::Task {
    dto::Task {
        task_arn: task.task_arn().unwrap_or_default().to_string(),
        last_status: task.last_status().map(str::to_string),
        desired_status: task.desired_status().map(str::to_string),
        stopped_reason: task.stopped_reason().map(str::to_string),
        containers: task
            .containers()
            .iter()
            .map(|c| dto::Container {
                name: c.name().map(str::to_string),
                exit_code: c.exit_code(),
                reason: c.reason().map(str::to_string),
            })
            .collect(),
    }
}

fn failure(failure: &ecs::Failure) -> dto::Failure {
    dto::Failure {
        arn: failure.arn().map(str::to_string),
        reason: failure.reason().map(str::to_string),
        detail: failure.detail().map(str::to_string),
    }
}
