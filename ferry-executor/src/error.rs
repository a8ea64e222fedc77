//! Error types for the executor
//!
//! Every failure of a run surfaces as exactly one [`ExecutorError`]. The
//! variants keep infrastructure failures apart from a task that ran and
//! reported failure ([`ExecutorError::RemoteTaskFailed`]).

use ferry_client::ClientError;
use ferry_core::domain::task::{TaskHandle, TaskIdentity};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for executor operations
pub type Result<T> = std::result::Result<T, ExecutorError>;

/// Errors that can occur while driving a remote task
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Invalid configuration, detected before any remote call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller identity could not be resolved
    #[error("Authentication for task {identity} failed: {message}")]
    Authentication {
        identity: TaskIdentity,
        message: String,
    },

    /// Registration or launch was rejected
    #[error("Submission of task {identity} failed: {message}")]
    Submission {
        identity: TaskIdentity,
        message: String,
    },

    /// The object store could not be reached or written
    #[error("Transfer of artifact {key} failed: {message}")]
    Transfer { key: String, message: String },

    /// No artifact exists under the key
    #[error("Artifact {key} not found")]
    NotFound { key: String },

    /// The artifact exists but does not decode
    #[error("Failed to deserialize artifact {key}: {message}")]
    Deserialization { key: String, message: String },

    /// The task reported success but left no result behind
    #[error("Task {identity} ({handle}) exited with code 0 but result artifact {key} is missing")]
    ResultMissing {
        identity: TaskIdentity,
        handle: TaskHandle,
        key: String,
    },

    /// The task ran and reported failure
    #[error("Task {identity} ({handle}) failed with exit code {exit_code}")]
    RemoteTaskFailed {
        identity: TaskIdentity,
        handle: TaskHandle,
        exit_code: i32,
    },

    /// Listing or describing tasks failed
    #[error("Status query for task {identity} ({handle}) failed: {source}")]
    Status {
        identity: TaskIdentity,
        handle: TaskHandle,
        #[source]
        source: ClientError,
    },

    /// The stop request was rejected
    #[error("Cancellation of task {handle} failed: {source}")]
    Cancellation {
        handle: TaskHandle,
        #[source]
        source: ClientError,
    },

    /// The task did not stop within the configured bound
    #[error("Task {identity} ({handle}) did not stop within {waited:?}")]
    PollTimeout {
        identity: TaskIdentity,
        handle: TaskHandle,
        waited: Duration,
    },
}

impl ExecutorError {
    /// Exit code of a task that ran and failed
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::RemoteTaskFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Check if the error comes from the task itself rather than the infrastructure
    pub fn is_task_failure(&self) -> bool {
        matches!(self, Self::RemoteTaskFailed { .. })
    }
}
