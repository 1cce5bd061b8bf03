//! Core domain types
//!
//! Plain configuration records derived from the resolved environment. They
//! are built once per invocation and consumed by the composers.

pub mod context;
pub mod settings;
pub mod tags;

pub use context::AppContext;
pub use settings::{
    AppResources, DomainBinding, ResourceSettings, SourceRepo, build_resource_settings,
};
pub use tags::Tags;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    /// Environments in deployment order
    pub const ALL: [Environment; 2] = [Environment::Staging, Environment::Production];

    /// Lowercase label used in ids, tags and directory names
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Prefix of this environment's variables (e.g. `STAGING_DOMAIN`)
    pub fn var_prefix(&self) -> &'static str {
        match self {
            Environment::Staging => "STAGING",
            Environment::Production => "PRODUCTION",
        }
    }

    /// Build artifact directory consumed by the edge function
    pub fn build_dir(&self) -> String {
        format!("build-{}", self.label())
    }

    /// NODE_ENV passed to the application build
    pub fn node_env(&self) -> &'static str {
        match self {
            Environment::Staging => "development",
            Environment::Production => "production",
        }
    }

    /// Edge function memory allocation in MiB
    pub fn memory_mib(&self) -> u32 {
        match self {
            Environment::Staging => 512,
            Environment::Production => 1024,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
