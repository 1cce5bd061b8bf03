//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod check_env;
mod synth;
mod verify;

use anyhow::{Context, Result};
use clap::Subcommand;
use nextedge_core::env::{self, EnvironmentConfig};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build both environments and write the pipeline assembly (default)
    Synth,
    /// Validate deployment variables without building anything
    CheckEnv,
    /// Smoke-test a deployed domain
    Verify {
        /// Domain or URL to check (bare domains use https)
        target: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Synth => synth::handle_synth(config).await,
        Commands::CheckEnv => check_env::handle_check_env(config),
        Commands::Verify { target } => verify::handle_verify(&target).await,
    }
}

/// Resolve deployment variables for the configured app directory
///
/// Process environment layered over `.env.local` or `.env`.
fn load_environment(config: &Config) -> Result<EnvironmentConfig> {
    let sources = env::load_sources(&config.app_dir).context("Failed to load env file")?;
    let resolved = env::resolve(&sources)?;
    Ok(resolved)
}
