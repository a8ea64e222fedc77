//! Ferry executor
//!
//! Runs a single function call as a one-off container task on a remote
//! serverless container platform, then brings its result back.
//!
//! A run goes through four stages, each owned by one component:
//! - [`service::ArtifactStore`] uploads the call to object storage
//! - [`service::TaskSubmitter`] registers a task definition and launches it
//! - [`scheduler::StatusPoller`] waits for the task to stop
//! - [`service::ResultRetriever`] downloads the result and the task's logs
//!
//! [`RemoteExecutor`] strings them together.
//!
//! # Example
//!
//! ```no_run
//! use ferry_core::domain::call::TaskCall;
//! use ferry_core::domain::task::TaskMetadata;
//! use ferry_executor::{ExecutorConfig, RemoteExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ferry_executor::ExecutorError> {
//!     let executor = RemoteExecutor::new(ExecutorConfig::from_env()).await;
//!     let call = TaskCall::new("train").kwarg("epochs", 10);
//!     let metadata = TaskMetadata {
//!         dispatch_id: "3f2c".to_string(),
//!         node_id: 0,
//!     };
//!
//!     let output = executor.run::<serde_json::Value>(&call, &metadata).await?;
//!     println!("{}", output.value);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod repository;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::ExecutorConfig;
pub use error::{ExecutorError, Result};
pub use executor::{Ports, RemoteExecutor, TaskOutput};
