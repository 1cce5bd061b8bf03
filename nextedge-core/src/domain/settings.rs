//! Resource settings per environment

use serde::{Deserialize, Serialize};

use super::Environment;
use crate::env::{EnvironmentConfig, EnvironmentParams};

/// Custom domain attached to a distribution
///
/// Only exists when every field is non-empty. A partial binding is never
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainBinding {
    pub domain: String,
    pub certificate_arn: String,
    pub hosted_zone_id: String,
    pub zone_name: String,
}

impl DomainBinding {
    /// Builds a binding if all four parts are present and non-empty
    pub fn from_parts(
        domain: Option<&str>,
        certificate_arn: Option<&str>,
        hosted_zone_id: Option<&str>,
        zone_name: Option<&str>,
    ) -> Option<Self> {
        Some(Self {
            domain: non_blank(domain)?.to_string(),
            certificate_arn: non_blank(certificate_arn)?.to_string(),
            hosted_zone_id: non_blank(hosted_zone_id)?.to_string(),
            zone_name: non_blank(zone_name)?.to_string(),
        })
    }

    /// Public URL served under this binding
    pub fn url(&self) -> String {
        format!("https://{}", self.domain)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Source repository checked out by a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepo {
    pub repo_string: String,
    pub branch: String,
    pub connection_arn: String,
}

/// Settings for one deployment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSettings {
    pub environment: Environment,
    pub memory_mib: u32,
    pub source: SourceRepo,
    pub domain: Option<DomainBinding>,
}

/// Settings for both environments plus the deploy notification list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppResources {
    pub staging: ResourceSettings,
    pub production: ResourceSettings,
    pub notification_emails: Vec<String>,
}

impl AppResources {
    pub fn for_environment(&self, env: Environment) -> &ResourceSettings {
        match env {
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }
}

fn settings_for(
    env: Environment,
    params: &EnvironmentParams,
    connection_arn: &str,
) -> ResourceSettings {
    ResourceSettings {
        environment: env,
        memory_mib: env.memory_mib(),
        source: SourceRepo {
            repo_string: params.repo_string.clone(),
            branch: params.source_branch.clone(),
            connection_arn: connection_arn.to_string(),
        },
        domain: DomainBinding::from_parts(
            params.domain.as_deref(),
            params.ssl_cert_arn.as_deref(),
            params.hosted_zone_id.as_deref(),
            params.zone_name.as_deref(),
        ),
    }
}

/// Derive staging and production settings from the resolved configuration
pub fn build_resource_settings(config: &EnvironmentConfig) -> AppResources {
    AppResources {
        staging: settings_for(Environment::Staging, &config.staging, &config.connection_arn),
        production: settings_for(
            Environment::Production,
            &config.production,
            &config.connection_arn,
        ),
        notification_emails: config.notification_emails.clone(),
    }
}
