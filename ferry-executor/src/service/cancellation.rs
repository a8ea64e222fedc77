//! Task cancellation

use ferry_core::domain::task::TaskHandle;
use tracing::info;

use crate::error::{ExecutorError, Result};
use crate::repository::ExecutionService;

/// Reason sent when the caller gives none
pub const DEFAULT_CANCEL_REASON: &str = "None";

/// Requests that a task stop
///
/// Returns once the request is acknowledged. A poller watching the same task
/// is not notified; it observes the stop like any other.
pub async fn cancel_task(
    service: &dyn ExecutionService,
    cluster: &str,
    handle: &TaskHandle,
    reason: &str,
) -> Result<()> {
    info!("Requesting stop of task {} ({})", handle, reason);

    service
        .stop(cluster, handle, reason)
        .await
        .map_err(|source| ExecutorError::Cancellation {
            handle: handle.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecution;

    #[tokio::test]
    async fn test_cancel_sends_stop() {
        let service = ScriptedExecution::succeeding();
        let handle = service.handle();

        cancel_task(&service, "ferry-cluster", &handle, DEFAULT_CANCEL_REASON)
            .await
            .unwrap();

        assert_eq!(
            service.stops(),
            vec![(handle, DEFAULT_CANCEL_REASON.to_string())]
        );
    }
}
