//! Result retrieval
//!
//! Fetches what a successfully stopped task left behind: its result
//! artifact and, best-effort, its log output.

use ferry_core::domain::definition::LogDestination;
use ferry_core::domain::log::format_log_text;
use ferry_core::domain::task::{TaskHandle, TaskIdentity};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ExecutorError, Result};
use crate::repository::LogService;
use crate::service::ArtifactStore;

/// Retrieves results and logs of stopped tasks
pub struct ResultRetriever {
    artifacts: Arc<ArtifactStore>,
    logs: Arc<dyn LogService>,
    destination: LogDestination,
}

impl ResultRetriever {
    pub fn new(
        artifacts: Arc<ArtifactStore>,
        logs: Arc<dyn LogService>,
        destination: LogDestination,
    ) -> Self {
        Self {
            artifacts,
            logs,
            destination,
        }
    }

    /// Downloads the result of a task that exited with code 0
    ///
    /// A missing artifact at this point means the platform reported success
    /// for a task that never wrote its result; it is reported as
    /// [`ExecutorError::ResultMissing`] rather than a plain not-found.
    pub async fn fetch<T: DeserializeOwned + Send + 'static>(
        &self,
        identity: &TaskIdentity,
        handle: &TaskHandle,
    ) -> Result<T> {
        self.artifacts
            .download_result(identity)
            .await
            .map_err(|err| match err {
                ExecutorError::NotFound { key } => ExecutorError::ResultMissing {
                    identity: identity.clone(),
                    handle: handle.clone(),
                    key,
                },
                other => other,
            })
    }

    /// Reads the task's log output
    ///
    /// Never fails: a missing or unreadable stream yields empty text.
    pub async fn fetch_logs(&self, identity: &TaskIdentity, handle: &TaskHandle) -> String {
        let stream = self
            .destination
            .stream_name(&identity.container_name(), handle);
        debug!("Reading logs from {}/{}", self.destination.group, stream);

        match self.logs.get_events(&self.destination.group, &stream).await {
            Ok(events) => format_log_text(&events),
            Err(e) => {
                warn!("Could not read logs of task {} from {}: {}", handle, stream, e);
                String::new()
            }
        }
    }
}
