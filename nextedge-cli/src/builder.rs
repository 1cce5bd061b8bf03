//! Application build invocation
//!
//! Runs the external build tool once per environment to produce the
//! `build-<env>` artifact directory the edge function is deployed from.
//! Builds run one after another; the first failure aborts the invocation.
//! A build that exits cleanly without producing its directory is a failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use nextedge_core::domain::Environment;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Lines of stderr kept in a build failure message
const STDERR_TAIL_LINES: usize = 20;

/// Parameters for one environment build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub environment: Environment,
    /// Artifact directory relative to the app directory
    pub out_dir: String,
    /// Value of NODE_ENV for the build
    pub node_env: &'static str,
}

impl BuildRequest {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            out_dir: environment.build_dir(),
            node_env: environment.node_env(),
        }
    }
}

/// Something that can build the application for an environment
#[async_trait]
pub trait AppBuilder: Send + Sync {
    async fn build(&self, request: &BuildRequest) -> Result<()>;
}

/// Fails unless the artifact directory for `request` exists in `app_dir`
pub fn ensure_artifact(app_dir: &Path, request: &BuildRequest) -> Result<()> {
    let path = app_dir.join(&request.out_dir);
    if !path.is_dir() {
        anyhow::bail!(
            "Build artifact for {} missing: {:?} is not a directory",
            request.environment,
            path
        );
    }
    Ok(())
}

/// Builds by spawning a configured command in the app directory
///
/// The command receives `NODE_ENV` and `BUILD_OUTPUT_DIR` in its environment
/// and must write the artifact to `BUILD_OUTPUT_DIR`.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    app_dir: PathBuf,
}

impl CommandBuilder {
    /// Parse a whitespace-separated command line
    pub fn new(command_line: &str, app_dir: &Path) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("Build command is empty"))?;

        Ok(Self {
            program,
            args: parts.collect(),
            app_dir: app_dir.to_path_buf(),
        })
    }
}

#[async_trait]
impl AppBuilder for CommandBuilder {
    async fn build(&self, request: &BuildRequest) -> Result<()> {
        info!(
            "Building {} app into ./{} (NODE_ENV={})",
            request.environment, request.out_dir, request.node_env
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.app_dir)
            .env("NODE_ENV", request.node_env)
            .env("BUILD_OUTPUT_DIR", &request.out_dir)
            .output()
            .await
            .with_context(|| format!("Failed to execute build command '{}'", self.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stdout.trim().is_empty() {
            debug!("build stdout: {}", stdout.trim());
        }

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            let tail: Vec<&str> = stderr.lines().rev().take(STDERR_TAIL_LINES).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();

            anyhow::bail!(
                "Build for {} failed: exit_code={}, stderr='{}'",
                request.environment,
                exit_code,
                tail.join("\n").trim()
            );
        }

        ensure_artifact(&self.app_dir, request).with_context(|| {
            format!(
                "Build command for {} exited successfully but did not write ./{}",
                request.environment, request.out_dir
            )
        })?;

        info!("Build for {} finished", request.environment);
        Ok(())
    }
}

/// Reuses artifacts from an earlier build, only checking they exist
#[derive(Debug, Clone)]
pub struct ExistingArtifacts {
    app_dir: PathBuf,
}

impl ExistingArtifacts {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl AppBuilder for ExistingArtifacts {
    async fn build(&self, request: &BuildRequest) -> Result<()> {
        ensure_artifact(&self.app_dir, request)?;
        info!("Reusing ./{} for {}", request.out_dir, request.environment);
        Ok(())
    }
}

/// Build every environment in order, stopping at the first failure
pub async fn build_all(builder: &dyn AppBuilder) -> Result<()> {
    for env in Environment::ALL {
        builder.build(&BuildRequest::for_environment(env)).await?;
    }
    Ok(())
}
