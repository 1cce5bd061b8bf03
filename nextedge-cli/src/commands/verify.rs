//! Verify command handler

use anyhow::{Context, Result};
use colored::*;
use nextedge_client::SmokeClient;

pub async fn handle_verify(target: &str) -> Result<()> {
    let client = SmokeClient::new().context("Failed to initialise HTTP client")?;
    let report = client
        .check(target)
        .await
        .with_context(|| format!("Smoke test failed for {}", target))?;

    println!(
        "{} {} responded with {}",
        "✓".green().bold(),
        report.url.cyan(),
        report.status
    );
    Ok(())
}
