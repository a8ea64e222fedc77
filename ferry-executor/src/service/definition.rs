//! Task definition builder

use ferry_core::domain::definition::{
    ENV_CALL_URI, ENV_DISPATCH_ID, ENV_NODE_ID, ENV_RESULT_URI, LogDestination, NetworkPlacement,
    TaskDefinition, object_uri, to_units,
};
use ferry_core::domain::task::TaskIdentity;
use std::collections::BTreeMap;

use crate::config::ExecutorConfig;

/// Builds the definition of the task running `identity`
///
/// Pure: the same identity and configuration always yield an equal definition.
/// The container learns where its call and result live from its environment.
pub fn build_definition(identity: &TaskIdentity, config: &ExecutorConfig) -> TaskDefinition {
    let bucket = &config.s3_bucket_name;

    let environment = BTreeMap::from([
        (
            ENV_CALL_URI.to_string(),
            object_uri(bucket, &identity.call_artifact_key()),
        ),
        (
            ENV_RESULT_URI.to_string(),
            object_uri(bucket, &identity.result_artifact_key()),
        ),
        (ENV_DISPATCH_ID.to_string(), identity.dispatch_id.clone()),
        (ENV_NODE_ID.to_string(), identity.node_id.to_string()),
    ]);

    TaskDefinition {
        family: config.ecs_task_family_name.clone(),
        container_name: identity.container_name(),
        image: config.container_image.clone(),
        cpu_units: to_units(config.vcpu),
        memory_mib: to_units(config.memory),
        execution_role_name: config.ecs_task_execution_role_name.clone(),
        task_role_name: config.ecs_task_role_name.clone(),
        network: NetworkPlacement {
            subnets: config.ecs_task_subnet_ids.clone(),
            security_groups: config.ecs_task_security_group_ids.clone(),
            assign_public_ip: config.assign_public_ip,
        },
        log: LogDestination {
            group: config.ecs_task_log_group_name.clone(),
            region: config.region.clone(),
            stream_prefix: config.log_stream_prefix.clone(),
        },
        environment,
    }
}
