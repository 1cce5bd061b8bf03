//! Synth command handler
//!
//! Resolve configuration, build staging and production, compose both
//! pipelines and write them to the output directory. Configuration is
//! fully validated before any build starts.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use nextedge_core::compose::{compose_production_pipeline, compose_staging_pipeline};
use nextedge_core::domain::{AppContext, build_resource_settings};
use nextedge_core::env::{self, VarSource};
use std::path::PathBuf;
use tracing::info;

use crate::assembly::write_assembly;
use crate::builder::{AppBuilder, CommandBuilder, ExistingArtifacts, build_all};
use crate::config::{Config, app_version};

/// What a synthesis run produced
#[derive(Debug)]
pub(crate) struct SynthOutput {
    pub manifest: PathBuf,
    pub pipelines: Vec<String>,
}

pub async fn handle_synth(config: &Config) -> Result<()> {
    config.validate()?;

    let sources = env::load_sources(&config.app_dir).context("Failed to load env file")?;

    let output = if config.skip_build {
        info!("Skipping application builds");
        run_synth(config, &sources, &ExistingArtifacts::new(&config.app_dir)).await?
    } else {
        let builder = CommandBuilder::new(&config.build_command, &config.app_dir)?;
        run_synth(config, &sources, &builder).await?
    };

    println!("{}", "✓ Synthesis complete".green().bold());
    for name in &output.pipelines {
        println!("  {} {}", "Pipeline".green(), name.cyan());
    }
    println!(
        "  {} {}",
        "Manifest".green(),
        output.manifest.display().to_string().cyan()
    );

    Ok(())
}

/// Resolve, build, compose and write, in that order
///
/// Nothing is built or written unless every required variable resolves.
pub(crate) async fn run_synth(
    config: &Config,
    source: &dyn VarSource,
    builder: &dyn AppBuilder,
) -> Result<SynthOutput> {
    let environment = env::resolve(source)?;
    let version = app_version(&config.app_dir)?;

    build_all(builder).await?;

    let ctx = AppContext::new(&environment, version);
    let resources = build_resource_settings(&environment);
    let synthesized_at = Utc::now();

    let pipelines = vec![
        compose_staging_pipeline(&ctx, &resources, synthesized_at),
        compose_production_pipeline(&ctx, &resources, synthesized_at),
    ];

    let manifest = write_assembly(&config.out_dir, &ctx.app_version, synthesized_at, &pipelines)?;

    Ok(SynthOutput {
        manifest,
        pipelines: pipelines.into_iter().map(|p| p.name).collect(),
    })
}
