//! Deployment variable sources
//!
//! This module provides a trait-based abstraction for variable lookup so the
//! resolver can run against different backends:
//! - CLI: Process environment layered over the selected env file
//! - Tests: Plain in-memory maps

pub mod resolver;

pub use resolver::{EnvironmentConfig, EnvironmentParams, REQUIRED_KEYS, resolve};

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default env file name
pub const ENV_FILE: &str = ".env";

/// Local override env file name, preferred when present
pub const LOCAL_ENV_FILE: &str = ".env.local";

/// Trait for providing deployment variables
pub trait VarSource {
    /// Get a variable by name
    ///
    /// # Returns
    /// The raw value if the variable exists, otherwise None
    fn get(&self, name: &str) -> Option<String>;
}

/// Variables read from the current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Two sources consulted in order
///
/// The primary source wins whenever it has the variable, matching dotenv
/// behaviour where exported variables are never overridden by the file.
#[derive(Debug, Clone)]
pub struct Layered<P, F> {
    primary: P,
    fallback: F,
}

impl<P: VarSource, F: VarSource> Layered<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: VarSource, F: VarSource> VarSource for Layered<P, F> {
    fn get(&self, name: &str) -> Option<String> {
        self.primary.get(name).or_else(|| self.fallback.get(name))
    }
}

/// Selects the env file for an application directory
///
/// `.env.local` is used when it exists, otherwise `.env`. The returned path
/// may not exist.
pub fn select_env_file(dir: &Path) -> PathBuf {
    let local = dir.join(LOCAL_ENV_FILE);
    if local.exists() {
        local
    } else {
        dir.join(ENV_FILE)
    }
}

/// Reads an env file into a map
///
/// A missing file yields an empty map. Parse failures are reported with the
/// file path.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        tracing::debug!("Env file {:?} not found, using process environment only", path);
        return Ok(HashMap::new());
    }

    let to_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        vars.insert(key, value);
    }

    tracing::debug!("Loaded {} variables from {:?}", vars.len(), path);
    Ok(vars)
}

/// Builds the standard source for an application directory
///
/// Process variables layered over the selected env file.
pub fn load_sources(
    dir: &Path,
) -> Result<Layered<ProcessEnv, HashMap<String, String>>, ConfigError> {
    let path = select_env_file(dir);
    let file_vars = read_env_file(&path)?;
    Ok(Layered::new(ProcessEnv, file_vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nextedge-env-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_select_prefers_local_file() {
        let dir = temp_dir();
        fs::write(dir.join(ENV_FILE), "A=default\n").unwrap();
        fs::write(dir.join(LOCAL_ENV_FILE), "A=local\n").unwrap();

        assert_eq!(select_env_file(&dir), dir.join(LOCAL_ENV_FILE));

        let vars = read_env_file(&select_env_file(&dir)).unwrap();
        assert_eq!(vars.get("A"), Some(&"local".to_string()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_select_falls_back_to_default_file() {
        let dir = temp_dir();
        fs::write(dir.join(ENV_FILE), "A=default\nB=\"quoted value\"\n").unwrap();

        assert_eq!(select_env_file(&dir), dir.join(ENV_FILE));

        let vars = read_env_file(&select_env_file(&dir)).unwrap();
        assert_eq!(vars.get("A"), Some(&"default".to_string()));
        assert_eq!(vars.get("B"), Some(&"quoted value".to_string()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = temp_dir();
        let vars = read_env_file(&select_env_file(&dir)).unwrap();
        assert!(vars.is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_layered_primary_wins() {
        let mut primary = HashMap::new();
        primary.insert("A".to_string(), "primary".to_string());
        let mut fallback = HashMap::new();
        fallback.insert("A".to_string(), "fallback".to_string());
        fallback.insert("B".to_string(), "only-fallback".to_string());

        let source = Layered::new(primary, fallback);
        assert_eq!(source.get("A"), Some("primary".to_string()));
        assert_eq!(source.get("B"), Some("only-fallback".to_string()));
        assert_eq!(source.get("C"), None);
    }
}
