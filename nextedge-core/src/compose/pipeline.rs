//! Pipeline composer
//!
//! Pipelines are strictly linear:
//! `Source -> Synth -> Stage(staging) [-> Stage(production)] -> Done`.
//! Each stage carries ordered pre and post steps. Any failing step halts
//! the pipeline at that stage; nothing is retried or skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::notification::{NotificationFanout, compose_notifications};
use super::stack::{StackDefinition, compose_stack};
use crate::domain::{AppContext, AppResources, DomainBinding, Environment, ResourceSettings, Tags};

/// Edge functions can only be deployed from this region
pub const PIPELINE_REGION: &str = "us-east-1";

pub const SYNTH_COMMANDS: [&str; 3] = [
    "npm install -g aws-cdk@^1.128.0",
    "yarn install",
    "yarn cdk synth",
];

pub const APPROVAL_STEP: &str = "deploy-to-prod";
pub const TEST_STEP: &str = "execute-jest-tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComputeType {
    Medium,
}

/// Shell commands run in a build container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellStep {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install_commands: Vec<String>,
    pub commands: Vec<String>,
}

impl ShellStep {
    pub fn new(name: impl Into<String>, commands: &[&str]) -> Self {
        Self {
            name: name.into(),
            install_commands: Vec::new(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_install(mut self, commands: &[&str]) -> Self {
        self.install_commands = commands.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// A step attached before or after a stage deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Blocks until an operator approves or rejects; no timeout
    ManualApproval { name: String },
    Shell(ShellStep),
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::ManualApproval { name } => name,
            Step::Shell(shell) => &shell.name,
        }
    }
}

/// Steps wrapped around a stage deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOptions {
    pub pre: Vec<Step>,
    pub post: Vec<Step>,
}

impl StageOptions {
    /// Staging: no gate, smoke test when a custom domain is bound
    pub fn staging(settings: &ResourceSettings) -> Self {
        Self {
            pre: Vec::new(),
            post: smoke_test(settings).into_iter().collect(),
        }
    }

    /// Production: manual approval, then the test suite, then deploy
    pub fn production(settings: &ResourceSettings) -> Self {
        Self {
            pre: vec![
                Step::ManualApproval {
                    name: APPROVAL_STEP.to_string(),
                },
                Step::Shell(
                    ShellStep::new(TEST_STEP, &["yarn test"]).with_install(&["yarn install"]),
                ),
            ],
            post: smoke_test(settings).into_iter().collect(),
        }
    }

    fn for_environment(settings: &ResourceSettings) -> Self {
        match settings.environment {
            Environment::Staging => Self::staging(settings),
            Environment::Production => Self::production(settings),
        }
    }
}

/// HTTP check against the bound domain, None without a binding
fn smoke_test(settings: &ResourceSettings) -> Option<Step> {
    let binding: &DomainBinding = settings.domain.as_ref()?;
    let target = format!("API_HANDLER_DOMAIN={}", binding.url());
    Some(Step::Shell(ShellStep::new(
        format!("validate-{}-url", settings.environment),
        &[target.as_str(), "curl -Ssf $API_HANDLER_DOMAIN"],
    )))
}

/// One environment's deploy unit within a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDeployment {
    pub environment: Environment,
    pub stack: StackDefinition,
    #[serde(flatten)]
    pub options: StageOptions,
}

impl StageDeployment {
    fn new(ctx: &AppContext, settings: &ResourceSettings, built_at: DateTime<Utc>) -> Self {
        Self {
            environment: settings.environment,
            stack: compose_stack(ctx, settings, built_at),
            options: StageOptions::for_environment(settings),
        }
    }

    /// Step names in execution order, with the deployment itself as `deploy`
    pub fn step_order(&self) -> Vec<&str> {
        self.options
            .pre
            .iter()
            .map(Step::name)
            .chain(std::iter::once("deploy"))
            .chain(self.options.post.iter().map(Step::name))
            .collect()
    }
}

/// Repository checkout through a stored connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStep {
    pub repo_string: String,
    pub branch: String,
    pub connection_arn: String,
}

/// Position in a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Source,
    Synth,
    Stage(Environment),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub name: String,
    pub account: String,
    pub region: String,
    pub description: String,
    pub analytics_reporting: bool,
    pub tags: Tags,
    pub compute_type: ComputeType,
    pub source: SourceStep,
    pub synth: ShellStep,
    pub stages: Vec<StageDeployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationFanout>,
}

impl PipelineDefinition {
    /// Phases in the order a run passes through them
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases = vec![Phase::Source, Phase::Synth];
        phases.extend(self.stages.iter().map(|s| Phase::Stage(s.environment)));
        phases.push(Phase::Done);
        phases
    }

    /// Phase following `current`, None once done or if not part of this pipeline
    pub fn next_phase(&self, current: Phase) -> Option<Phase> {
        let phases = self.phases();
        let position = phases.iter().position(|p| *p == current)?;
        phases.get(position + 1).copied()
    }

    pub fn stage(&self, env: Environment) -> Option<&StageDeployment> {
        self.stages.iter().find(|s| s.environment == env)
    }
}

fn pipeline_base(
    ctx: &AppContext,
    env: Environment,
    settings: &ResourceSettings,
) -> PipelineDefinition {
    PipelineDefinition {
        name: format!("{}-{}-pipeline", ctx.app_name, env),
        account: ctx.account.clone(),
        region: PIPELINE_REGION.to_string(),
        description: format!(
            "Deployment of {} {} NextJS using Serverless CDK Construct",
            env, ctx.app_name
        ),
        analytics_reporting: true,
        tags: ctx.tags_for(env),
        compute_type: ComputeType::Medium,
        source: SourceStep {
            repo_string: settings.source.repo_string.clone(),
            branch: settings.source.branch.clone(),
            connection_arn: settings.source.connection_arn.clone(),
        },
        synth: ShellStep::new("Synth", &SYNTH_COMMANDS),
        stages: Vec::new(),
        notifications: None,
    }
}

/// Staging pipeline: deploys staging and notifies on every outcome
pub fn compose_staging_pipeline(
    ctx: &AppContext,
    resources: &AppResources,
    built_at: DateTime<Utc>,
) -> PipelineDefinition {
    let mut pipeline = pipeline_base(ctx, Environment::Staging, &resources.staging);
    pipeline
        .stages
        .push(StageDeployment::new(ctx, &resources.staging, built_at));
    pipeline.notifications = Some(compose_notifications(
        ctx,
        Environment::Staging,
        &pipeline.name,
        &resources.notification_emails,
    ));
    pipeline
}

/// Production pipeline: staging first, then gated production
pub fn compose_production_pipeline(
    ctx: &AppContext,
    resources: &AppResources,
    built_at: DateTime<Utc>,
) -> PipelineDefinition {
    let mut pipeline = pipeline_base(ctx, Environment::Production, &resources.production);
    for env in Environment::ALL {
        pipeline.stages.push(StageDeployment::new(
            ctx,
            resources.for_environment(env),
            built_at,
        ));
    }
    pipeline
}
