//! Configuration module
//!
//! Invocation settings taken from CLI flags (with env fallbacks), and the
//! application version read from the NextJs project.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Version used when package.json has none
pub const FALLBACK_VERSION: &str = "0.0.0";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NextJs project directory (holds package.json and env files)
    pub app_dir: PathBuf,

    /// Directory the cloud assembly is written to
    pub out_dir: PathBuf,

    /// Command line that builds the application for one environment
    pub build_command: String,

    /// Reuse existing build directories instead of rebuilding
    pub skip_build: bool,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.build_command.trim().is_empty() && !self.skip_build {
            anyhow::bail!("build_command cannot be empty");
        }

        if !self.app_dir.is_dir() {
            anyhow::bail!("app_dir {:?} is not a directory", self.app_dir);
        }

        Ok(())
    }
}

/// Reads the `version` field of `<app_dir>/package.json`
///
/// Missing file or field falls back to [`FALLBACK_VERSION`]; a file that is
/// not valid JSON is an error.
pub fn app_version(app_dir: &Path) -> Result<String> {
    let path = app_dir.join("package.json");
    if !path.exists() {
        tracing::warn!("No package.json in {:?}, using version {}", app_dir, FALLBACK_VERSION);
        return Ok(FALLBACK_VERSION.to_string());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let manifest: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {:?}", path))?;

    Ok(manifest
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or(FALLBACK_VERSION)
        .to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;

    /// Complete set of required deployment variables
    pub(crate) fn deployment_vars() -> std::collections::HashMap<String, String> {
        [
            ("AWS_ACCOUNT_ID", "123456789012"),
            ("AWS_REGION_DEFAULT", "eu-west-1"),
            ("SOURCE_REPO_CONNECTION_ARN", "arn:conn"),
            ("STAGING_REPO_STRING", "acme/storefront"),
            ("STAGING_SOURCE_BRANCH", "develop"),
            ("PRODUCTION_REPO_STRING", "acme/storefront"),
            ("PRODUCTION_SOURCE_BRANCH", "main"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub(crate) fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nextedge-cli-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_app_version_from_package_json() {
        let dir = temp_dir();
        fs::write(
            dir.join("package.json"),
            r#"{ "name": "storefront", "version": "2.3.1" }"#,
        )
        .unwrap();

        assert_eq!(app_version(&dir).unwrap(), "2.3.1");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_app_version_fallbacks() {
        let dir = temp_dir();
        assert_eq!(app_version(&dir).unwrap(), FALLBACK_VERSION);

        fs::write(dir.join("package.json"), r#"{ "name": "storefront" }"#).unwrap();
        assert_eq!(app_version(&dir).unwrap(), FALLBACK_VERSION);

        fs::write(dir.join("package.json"), "not json").unwrap();
        assert!(app_version(&dir).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_validation() {
        let dir = temp_dir();
        let mut config = Config {
            app_dir: dir.clone(),
            out_dir: dir.join("out"),
            build_command: "yarn build".to_string(),
            skip_build: false,
        };
        assert!(config.validate().is_ok());

        config.build_command = " ".to_string();
        assert!(config.validate().is_err());

        config.skip_build = true;
        assert!(config.validate().is_ok());

        config.app_dir = dir.join("missing");
        assert!(config.validate().is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
