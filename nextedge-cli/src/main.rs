//! NextEdge CLI
//!
//! Deploys a server-rendered NextJs application to CloudFront and
//! Lambda@Edge through staging and production delivery pipelines.
//!
//! Running `nextedge` with no arguments performs a full synthesis:
//! - Resolve deployment variables (fails fast listing every missing key)
//! - Build the staging and production app artifacts, one after the other
//! - Compose the staging and production pipelines
//! - Write them to the output directory

mod assembly;
mod builder;
mod commands;
mod config;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nextedge")]
#[command(about = "Serverless NextJs deployment pipelines", long_about = None)]
struct Cli {
    /// NextJs project directory
    #[arg(long, env = "NEXTEDGE_APP_DIR", default_value = ".")]
    app_dir: PathBuf,

    /// Output directory for the pipeline assembly
    #[arg(long, env = "NEXTEDGE_OUT_DIR", default_value = "nextedge.out")]
    out_dir: PathBuf,

    /// Command that builds the app for one environment
    ///
    /// Runs with NODE_ENV and BUILD_OUTPUT_DIR set and must write the
    /// artifact to BUILD_OUTPUT_DIR (build-staging or build-production).
    #[arg(long, env = "NEXTEDGE_BUILD_COMMAND", default_value = "yarn build")]
    build_command: String,

    /// Reuse existing build directories
    #[arg(long)]
    skip_build: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nextedge=info,nextedge_core=info,nextedge_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        app_dir: cli.app_dir,
        out_dir: cli.out_dir,
        build_command: cli.build_command,
        skip_build: cli.skip_build,
    };

    let command = cli.command.unwrap_or(Commands::Synth);
    match handle_command(command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
