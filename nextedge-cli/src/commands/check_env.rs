//! Check-env command handler
//!
//! Resolves deployment variables and prints what would be deployed.

use anyhow::Result;
use colored::*;
use nextedge_core::domain::{Environment, build_resource_settings};

use super::load_environment;
use crate::config::Config;

pub fn handle_check_env(config: &Config) -> Result<()> {
    let environment = load_environment(config)?;
    let resources = build_resource_settings(&environment);

    println!("{}", "✓ Environment is complete".green().bold());
    println!("  Account: {}", environment.account_id.cyan());
    println!("  Region:  {}", environment.region.cyan());

    for env in Environment::ALL {
        let settings = resources.for_environment(env);
        let domain = match &settings.domain {
            Some(binding) => binding.url().cyan().to_string(),
            None => "none (CloudFront hostname only)".dimmed().to_string(),
        };
        println!(
            "  {:<10} {}@{}  domain: {}",
            env.label().bold(),
            settings.source.repo_string,
            settings.source.branch,
            domain
        );
    }

    println!(
        "  Notifications: {}",
        if resources.notification_emails.is_empty() {
            "none".dimmed().to_string()
        } else {
            resources.notification_emails.join(", ")
        }
    );

    Ok(())
}
