//! Ferry CLI
//!
//! Command-line interface for running function calls as remote container
//! tasks and inspecting the tasks afterwards.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Overrides;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ferry")]
#[command(about = "Run function calls as remote container tasks", long_about = None)]
struct Cli {
    /// Region the tasks run in
    #[arg(long, global = true)]
    region: Option<String>,

    /// Single endpoint for all services (e.g. a LocalStack emulator)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Bucket holding call and result artifacts
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// Cluster tasks are launched on
    #[arg(long, global = true)]
    cluster: Option<String>,

    /// Task definition family
    #[arg(long, global = true)]
    family: Option<String>,

    /// Container image
    #[arg(long, global = true)]
    image: Option<String>,

    /// Seconds between status polls
    #[arg(long, global = true)]
    poll_freq: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so results on stdout stay machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry_executor=info,ferry_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let overrides = Overrides {
        region: cli.region,
        endpoint_url: cli.endpoint_url,
        bucket: cli.bucket,
        cluster: cli.cluster,
        family: cli.family,
        image: cli.image,
        poll_freq: cli.poll_freq,
    };
    let config = overrides.load()?;
    debug!(
        "Using region {}, cluster {}, bucket {}",
        config.region, config.ecs_cluster_name, config.s3_bucket_name
    );

    handle_command(cli.command, config).await
}
