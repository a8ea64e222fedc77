//! Run command handler

use anyhow::{Context, Result};
use colored::*;
use ferry_core::domain::call::TaskCall;
use ferry_core::domain::task::{TaskIdentity, TaskMetadata};
use ferry_executor::{ExecutorError, RemoteExecutor};
use std::path::Path;

/// Submit a call, wait for it and print the result followed by the task logs
pub async fn run_call(
    executor: &RemoteExecutor,
    call_path: &Path,
    dispatch_id: Option<String>,
    node_id: i64,
) -> Result<()> {
    let call = read_call(call_path).await?;
    let identity = task_identity(dispatch_id, node_id);
    let metadata = TaskMetadata {
        dispatch_id: identity.dispatch_id.clone(),
        node_id: identity.node_id,
    };

    println!(
        "{} {} {}",
        "Running".bold(),
        call.function.cyan(),
        format!("({})", identity).dimmed()
    );

    let output = executor
        .run::<serde_json::Value>(&call, &metadata)
        .await
        .map_err(run_error)?;

    println!("{} {}", "✓ Task".green(), output.handle.as_str().green());
    println!();
    println!("{}", serde_json::to_string_pretty(&output.value)?);

    if !output.logs.is_empty() {
        println!();
        println!("{}", "Logs:".bold());
        println!("{}", "─".repeat(80).dimmed());
        print!("{}", output.logs);
        println!("{}", "─".repeat(80).dimmed());
    }
    Ok(())
}

/// Identity for this run; a fresh dispatch ID unless one is given
fn task_identity(dispatch_id: Option<String>, node_id: i64) -> TaskIdentity {
    match dispatch_id {
        Some(dispatch_id) => TaskIdentity::new(dispatch_id, node_id),
        None => TaskIdentity::generate(node_id),
    }
}

/// A failed task already names itself and its exit code; infrastructure
/// failures get the command context on top.
fn run_error(err: ExecutorError) -> anyhow::Error {
    if err.is_task_failure() {
        err.into()
    } else {
        anyhow::Error::new(err).context("Run failed")
    }
}

async fn read_call(path: &Path) -> Result<TaskCall> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read call file {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Call file {} is not a valid call", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::domain::task::TaskHandle;

    #[tokio::test]
    async fn test_read_call_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.json");
        tokio::fs::write(&path, r#"{"function": "train", "args": [1], "kwargs": {"lr": 0.1}}"#)
            .await
            .unwrap();

        let call = read_call(&path).await.unwrap();
        assert_eq!(call.function, "train");
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.kwargs["lr"], 0.1);
    }

    #[tokio::test]
    async fn test_missing_call_file() {
        let err = read_call(Path::new("/nonexistent/call.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read call file"));
    }

    #[test]
    fn test_task_identity_defaults_to_fresh_dispatch() {
        let given = task_identity(Some("nightly".to_string()), 3);
        assert_eq!(given, TaskIdentity::new("nightly", 3));

        let first = task_identity(None, 0);
        let second = task_identity(None, 0);
        assert_ne!(first.dispatch_id, second.dispatch_id);
        assert_eq!(first.node_id, 0);
    }

    #[test]
    fn test_task_failure_is_reported_once() {
        let err = run_error(ExecutorError::RemoteTaskFailed {
            identity: TaskIdentity::new("d", 1),
            handle: TaskHandle::new("arn:task/abc"),
            exit_code: 137,
        });

        let rendered = format!("{:#}", err);
        assert_eq!(rendered, "Task d/1 (arn:task/abc) failed with exit code 137");
        assert_eq!(err.chain().count(), 1);
    }

    #[test]
    fn test_infrastructure_failure_gets_context() {
        let err = run_error(ExecutorError::Configuration("bucket is empty".to_string()));
        assert_eq!(
            format!("{:#}", err),
            "Run failed: Configuration error: bucket is empty"
        );
    }
}
