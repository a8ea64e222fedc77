//! Task inspection command handlers

use anyhow::Result;
use colored::*;
use ferry_core::domain::status::TaskState;
use ferry_core::domain::task::{TaskHandle, TaskIdentity};
use ferry_executor::RemoteExecutor;

/// Print the classified state of a task
pub async fn show_status(
    executor: &RemoteExecutor,
    handle: &str,
    dispatch_id: String,
    node_id: i64,
) -> Result<()> {
    let handle = TaskHandle::new(handle);
    let identity = TaskIdentity::new(dispatch_id, node_id);
    let state = executor.status(&identity, &handle).await?;

    println!("{} {} ({})", "Task:".bold(), handle.as_str(), identity);
    println!("{} {}", "State:".bold(), format_state(&state));

    Ok(())
}

/// Print the log output of a task
pub async fn show_logs(
    executor: &RemoteExecutor,
    handle: &str,
    dispatch_id: String,
    node_id: i64,
) -> Result<()> {
    let handle = TaskHandle::new(handle);
    let identity = TaskIdentity::new(dispatch_id, node_id);
    let logs = executor.logs(&identity, &handle).await;

    if logs.is_empty() {
        println!("{}", "No logs found for this task.".yellow());
    } else {
        print!("{}", logs);
    }

    Ok(())
}

/// Request that a task stop
pub async fn cancel(executor: &RemoteExecutor, handle: &str, reason: Option<&str>) -> Result<()> {
    let handle = TaskHandle::new(handle);
    executor.cancel(&handle, reason).await?;

    println!("{} {}", "✓ Stop requested for".green(), handle.as_str());
    Ok(())
}

fn format_state(state: &TaskState) -> ColoredString {
    match state {
        TaskState::NotFound => "NOT_FOUND (not stopped yet or unknown)".yellow(),
        TaskState::InProgress => "IN_PROGRESS".blue(),
        TaskState::Terminal { exit_code: 0 } => state.to_string().green(),
        TaskState::Terminal { .. } => state.to_string().red(),
    }
}
