//! Environment resolver
//!
//! Turns a [`VarSource`] into a fully populated [`EnvironmentConfig`], or a
//! single error naming every missing required key.

use super::VarSource;
use crate::domain::Environment;
use crate::error::ConfigError;

pub const AWS_ACCOUNT_ID: &str = "AWS_ACCOUNT_ID";
pub const AWS_REGION_DEFAULT: &str = "AWS_REGION_DEFAULT";
pub const SOURCE_REPO_CONNECTION_ARN: &str = "SOURCE_REPO_CONNECTION_ARN";
pub const APP_NAME: &str = "APP_NAME";
pub const APP_ABBR: &str = "APP_ABBR";
pub const PROJECT_TAG: &str = "PROJECT_TAG";
pub const APP_NAME_TAG: &str = "APP_NAME_TAG";
pub const DEPLOY_NOTIFICATION_LIST: &str = "DEPLOY_NOTIFICATION_LIST";

pub const DEFAULT_APP_NAME: &str = "NextJs Serverless Starter";
pub const DEFAULT_APP_ABBR: &str = "nextjs-serverless";
pub const DEFAULT_PROJECT_TAG: &str = "Serverless Starters";
pub const DEFAULT_APP_NAME_TAG: &str = "NextJs Serverless";

/// Required keys in the order they are checked and reported
pub const REQUIRED_KEYS: [&str; 7] = [
    AWS_ACCOUNT_ID,
    AWS_REGION_DEFAULT,
    SOURCE_REPO_CONNECTION_ARN,
    "STAGING_REPO_STRING",
    "STAGING_SOURCE_BRANCH",
    "PRODUCTION_REPO_STRING",
    "PRODUCTION_SOURCE_BRANCH",
];

/// Per-environment deployment parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentParams {
    pub repo_string: String,
    pub source_branch: String,
    pub domain: Option<String>,
    pub ssl_cert_arn: Option<String>,
    pub hosted_zone_id: Option<String>,
    pub zone_name: Option<String>,
}

/// Resolved deployment configuration
///
/// Immutable once resolved; passed by reference to every composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub account_id: String,
    pub region: String,
    pub connection_arn: String,
    pub app_name: String,
    pub app_abbr: String,
    pub project_tag: String,
    pub app_name_tag: String,
    pub staging: EnvironmentParams,
    pub production: EnvironmentParams,
    pub notification_emails: Vec<String>,
}

impl EnvironmentConfig {
    /// Parameters for one environment
    pub fn params(&self, env: Environment) -> &EnvironmentParams {
        match env {
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }
}

/// Reads variables and records every required key that is absent
struct Collector<'a, S: ?Sized> {
    source: &'a S,
    missing: Vec<String>,
}

impl<'a, S: VarSource + ?Sized> Collector<'a, S> {
    fn new(source: &'a S) -> Self {
        Self {
            source,
            missing: Vec::new(),
        }
    }

    /// Trimmed value, None when absent or blank
    fn optional(&self, key: &str) -> Option<String> {
        self.source
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn optional_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&mut self, key: &str) -> String {
        match self.optional(key) {
            Some(value) => value,
            None => {
                self.missing.push(key.to_string());
                String::new()
            }
        }
    }

    fn environment(&mut self, env: Environment) -> EnvironmentParams {
        let prefix = env.var_prefix();
        EnvironmentParams {
            repo_string: self.required(&format!("{prefix}_REPO_STRING")),
            source_branch: self.required(&format!("{prefix}_SOURCE_BRANCH")),
            domain: self.optional(&format!("{prefix}_DOMAIN")),
            ssl_cert_arn: self.optional(&format!("{prefix}_DOMAIN_SSL_CERT_ARN")),
            hosted_zone_id: self.optional(&format!("{prefix}_HOSTED_ZONE_ID")),
            zone_name: self.optional(&format!("{prefix}_DOMAIN_ZONE_NAME")),
        }
    }
}

/// Resolve the deployment configuration
///
/// Fails with [`ConfigError::MissingVariables`] naming all required keys that
/// are absent or blank. Nothing else is attempted in that case.
pub fn resolve<S: VarSource + ?Sized>(source: &S) -> Result<EnvironmentConfig, ConfigError> {
    let mut vars = Collector::new(source);

    let account_id = vars.required(AWS_ACCOUNT_ID);
    let region = vars.required(AWS_REGION_DEFAULT);
    let connection_arn = vars.required(SOURCE_REPO_CONNECTION_ARN);
    let staging = vars.environment(Environment::Staging);
    let production = vars.environment(Environment::Production);

    if !vars.missing.is_empty() {
        return Err(ConfigError::MissingVariables(vars.missing));
    }

    let notification_emails = vars
        .optional(DEPLOY_NOTIFICATION_LIST)
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let config = EnvironmentConfig {
        account_id,
        region,
        connection_arn,
        app_name: vars.optional_or(APP_NAME, DEFAULT_APP_NAME),
        app_abbr: vars.optional_or(APP_ABBR, DEFAULT_APP_ABBR),
        project_tag: vars.optional_or(PROJECT_TAG, DEFAULT_PROJECT_TAG),
        app_name_tag: vars.optional_or(APP_NAME_TAG, DEFAULT_APP_NAME_TAG),
        staging,
        production,
        notification_emails,
    };

    tracing::info!("AWS account: {}", config.account_id);
    tracing::info!("AWS region: {}", config.region);

    Ok(config)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) fn complete_vars() -> HashMap<String, String> {
        [
            (AWS_ACCOUNT_ID, "123456789012"),
            (AWS_REGION_DEFAULT, "eu-west-1"),
            (
                SOURCE_REPO_CONNECTION_ARN,
                "arn:aws:codestar-connections:us-east-1:123456789012:connection/abc",
            ),
            ("STAGING_REPO_STRING", "acme/storefront"),
            ("STAGING_SOURCE_BRANCH", "develop"),
            ("PRODUCTION_REPO_STRING", "acme/storefront"),
            ("PRODUCTION_SOURCE_BRANCH", "main"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_resolve_complete() {
        let config = resolve(&complete_vars()).unwrap();

        assert_eq!(config.account_id, "123456789012");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.staging.source_branch, "develop");
        assert_eq!(config.production.source_branch, "main");
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
        assert!(config.staging.domain.is_none());
        assert!(config.notification_emails.is_empty());
    }

    #[test]
    fn test_missing_keys_reported_together() {
        let mut vars = complete_vars();
        vars.remove(AWS_ACCOUNT_ID);
        vars.remove("PRODUCTION_REPO_STRING");

        let err = resolve(&vars).unwrap_err();
        assert_eq!(
            err.missing_keys(),
            &["AWS_ACCOUNT_ID".to_string(), "PRODUCTION_REPO_STRING".to_string()]
        );

        let message = err.to_string();
        assert!(message.contains("AWS_ACCOUNT_ID"));
        assert!(message.contains("PRODUCTION_REPO_STRING"));
    }

    #[test]
    fn test_every_incomplete_subset_reports_each_key_once() {
        // Drop every non-empty subset of the required keys
        for mask in 1u32..(1 << REQUIRED_KEYS.len()) {
            let mut vars = complete_vars();
            let dropped: Vec<String> = REQUIRED_KEYS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, key)| key.to_string())
                .collect();
            for key in &dropped {
                vars.remove(key);
            }

            let err = resolve(&vars).unwrap_err();
            assert_eq!(err.missing_keys(), dropped.as_slice(), "mask {mask:b}");
        }
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut vars = complete_vars();
        vars.insert("STAGING_SOURCE_BRANCH".to_string(), "   ".to_string());

        let err = resolve(&vars).unwrap_err();
        assert_eq!(err.missing_keys(), &["STAGING_SOURCE_BRANCH".to_string()]);
    }

    #[test]
    fn test_optional_values() {
        let mut vars = complete_vars();
        vars.insert(APP_NAME.to_string(), "Storefront".to_string());
        vars.insert("PRODUCTION_DOMAIN".to_string(), "app.example.com".to_string());
        vars.insert("STAGING_HOSTED_ZONE_ID".to_string(), "".to_string());
        vars.insert(
            DEPLOY_NOTIFICATION_LIST.to_string(),
            "ops@example.com, dev@example.com,,".to_string(),
        );

        let config = resolve(&vars).unwrap();
        assert_eq!(config.app_name, "Storefront");
        assert_eq!(config.production.domain.as_deref(), Some("app.example.com"));
        assert_eq!(config.staging.hosted_zone_id, None);
        assert_eq!(
            config.notification_emails,
            vec!["ops@example.com".to_string(), "dev@example.com".to_string()]
        );
    }

    #[test]
    fn test_environment_fields_are_scoped() {
        let mut vars = complete_vars();
        vars.insert("PRODUCTION_REPO_STRING".to_string(), "acme/prod".to_string());

        let config = resolve(&vars).unwrap();
        assert_eq!(config.params(Environment::Staging).repo_string, "acme/storefront");
        assert_eq!(config.params(Environment::Production).repo_string, "acme/prod");
    }
}
