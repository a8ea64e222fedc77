//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod task;

use anyhow::Result;
use clap::Subcommand;
use ferry_executor::{ExecutorConfig, RemoteExecutor};
use std::path::PathBuf;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a function call remotely and print its result
    Run {
        /// JSON file holding the call: {"function": ..., "args": [...], "kwargs": {...}}
        #[arg(long)]
        call: PathBuf,

        /// Dispatch ID (defaults to a freshly generated one)
        #[arg(long)]
        dispatch_id: Option<String>,

        /// Node ID within the dispatch
        #[arg(long, default_value_t = 0)]
        node_id: i64,
    },
    /// Show the state of a task
    Status {
        /// Task handle (ARN)
        handle: String,

        /// Dispatch ID the task ran for
        #[arg(long)]
        dispatch_id: String,

        /// Node ID the task ran for
        #[arg(long)]
        node_id: i64,
    },
    /// Print the log output of a task
    Logs {
        /// Task handle (ARN)
        handle: String,

        /// Dispatch ID the task ran for
        #[arg(long)]
        dispatch_id: String,

        /// Node ID the task ran for
        #[arg(long)]
        node_id: i64,
    },
    /// Request that a task stop
    Cancel {
        /// Task handle (ARN)
        handle: String,

        /// Reason recorded with the stop request
        #[arg(long)]
        reason: Option<String>,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - Executor configuration with command-line overrides applied
pub async fn handle_command(command: Commands, config: ExecutorConfig) -> Result<()> {
    let executor = RemoteExecutor::new(config).await;

    match command {
        Commands::Run {
            call,
            dispatch_id,
            node_id,
        } => run::run_call(&executor, &call, dispatch_id, node_id).await,
        Commands::Status {
            handle,
            dispatch_id,
            node_id,
        } => task::show_status(&executor, &handle, dispatch_id, node_id).await,
        Commands::Logs {
            handle,
            dispatch_id,
            node_id,
        } => task::show_logs(&executor, &handle, dispatch_id, node_id).await,
        Commands::Cancel { handle, reason } => {
            task::cancel(&executor, &handle, reason.as_deref()).await
        }
    }
}
