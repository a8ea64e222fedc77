//! Status poller
//!
//! Answers "where is this task in its lifecycle?" by scanning the stopped
//! tasks of the family for the tracked handle, and waits for a task to stop
//! by repeating that question every `poll_freq`.
//!
//! The wait is a tokio sleep, so many runs can poll concurrently on one
//! runtime without holding a thread each.

use ferry_client::ClientError;
use ferry_core::domain::status::TaskState;
use ferry_core::domain::task::{TaskHandle, TaskIdentity};
use std::sync::Arc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ExecutorConfig;
use crate::error::{ExecutorError, Result};
use crate::repository::ExecutionService;

/// Polls the container service for the state of launched tasks
pub struct StatusPoller {
    service: Arc<dyn ExecutionService>,
    cluster: String,
    family: String,
    poll_freq: Duration,
    poll_timeout: Option<Duration>,
    status_retries: u32,
}

impl StatusPoller {
    /// Creates a poller for the cluster and family named in `config`
    pub fn new(service: Arc<dyn ExecutionService>, config: &ExecutorConfig) -> Self {
        Self {
            service,
            cluster: config.ecs_cluster_name.clone(),
            family: config.ecs_task_family_name.clone(),
            poll_freq: config.poll_freq,
            poll_timeout: config.poll_timeout,
            status_retries: config.status_retries,
        }
    }

    /// Classifies the current state of `handle`, launched for `identity`
    ///
    /// A handle that appears in no page is [`TaskState::NotFound`], not an
    /// error. Transient failures are retried up to `status_retries` times,
    /// `poll_freq` apart; anything else is raised at once.
    pub async fn query(&self, identity: &TaskIdentity, handle: &TaskHandle) -> Result<TaskState> {
        let mut attempt = 0;

        loop {
            match self.scan(handle).await {
                Ok(state) => return Ok(state),
                Err(e) if e.is_transient() && attempt < self.status_retries => {
                    attempt += 1;
                    warn!(
                        "[{}] Status query for {} failed (attempt {}/{}): {}",
                        identity, handle, attempt, self.status_retries, e
                    );
                    time::sleep(self.poll_freq).await;
                }
                Err(source) => {
                    return Err(ExecutorError::Status {
                        identity: identity.clone(),
                        handle: handle.clone(),
                        source,
                    });
                }
            }
        }
    }

    /// Waits until `handle` stops and returns its exit code
    ///
    /// Not-found and in-progress are treated alike: the task may not be
    /// listed yet. Without a `poll_timeout` this waits as long as the task runs.
    pub async fn wait(&self, identity: &TaskIdentity, handle: &TaskHandle) -> Result<i32> {
        let started = Instant::now();
        info!("[{}] Polling task {} every {:?}", identity, handle, self.poll_freq);

        loop {
            let state = self.query(identity, handle).await?;
            debug!("[{}] Task {} is {}", identity, handle, state);

            if let TaskState::Terminal { exit_code } = state {
                info!("[{}] Task {} stopped with exit code {}", identity, handle, exit_code);
                return Ok(exit_code);
            }

            if let Some(limit) = self.poll_timeout {
                let waited = started.elapsed();
                if waited >= limit {
                    return Err(ExecutorError::PollTimeout {
                        identity: identity.clone(),
                        handle: handle.clone(),
                        waited,
                    });
                }
            }

            time::sleep(self.poll_freq).await;
        }
    }

    /// Pages through the stopped tasks of the family looking for `handle`
    async fn scan(&self, handle: &TaskHandle) -> std::result::Result<TaskState, ClientError> {
        let mut next_token = None;

        loop {
            let page = self
                .service
                .list_stopped(&self.cluster, &self.family, next_token)
                .await?;

            // Listings are small and monotonic; an empty page ends the scan
            if page.handles.is_empty() {
                break;
            }

            let described = self.service.describe(&self.cluster, &page.handles).await?;
            if let Some(task) = described.iter().find(|task| &task.handle == handle) {
                return Ok(task.state());
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(TaskState::NotFound)
    }
}
