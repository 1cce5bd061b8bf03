//! Cloud assembly writer
//!
//! Serialises composed pipelines as pretty JSON, one file per pipeline,
//! plus a `manifest.json` indexing them.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nextedge_core::compose::PipelineDefinition;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub pipeline: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub app_version: String,
    pub synthesized_at: DateTime<Utc>,
    pub pipelines: Vec<ManifestEntry>,
}

/// File name for a pipeline, safe for any app name
fn file_name(pipeline_name: &str) -> String {
    let slug: String = pipeline_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{}.json", slug)
}

/// Write the assembly and return the manifest path
pub fn write_assembly(
    out_dir: &Path,
    app_version: &str,
    synthesized_at: DateTime<Utc>,
    pipelines: &[PipelineDefinition],
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    let mut entries = Vec::with_capacity(pipelines.len());
    for pipeline in pipelines {
        let file = file_name(&pipeline.name);
        let path = out_dir.join(&file);
        let json = serde_json::to_string_pretty(pipeline)
            .with_context(|| format!("Failed to serialise pipeline {}", pipeline.name))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;

        tracing::info!("Wrote {} to {:?}", pipeline.name, path);
        entries.push(ManifestEntry {
            pipeline: pipeline.name.clone(),
            file,
        });
    }

    let manifest = Manifest {
        app_version: app_version.to_string(),
        synthesized_at,
        pipelines: entries,
    };
    let path = out_dir.join(MANIFEST_FILE);
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {:?}", path))?;

    Ok(path)
}
