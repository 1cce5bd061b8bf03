//! Resource tags for cost and ownership attribution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Environment;

pub const PROJECT: &str = "Project";
pub const APP_VERSION: &str = "AppVersion";
pub const APP_NAME: &str = "AppName";
pub const ENVIRONMENT: &str = "Environment";

/// Flat string map attached to every provisioned resource
///
/// There are no mutating methods; deriving a variant returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Base tags shared by every environment
    pub fn new(project: &str, app_version: &str, app_name: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert(PROJECT.to_string(), project.to_string());
        map.insert(APP_VERSION.to_string(), app_version.to_string());
        map.insert(APP_NAME.to_string(), app_name.to_string());
        Self(map)
    }

    /// Copy of these tags with the Environment tag set
    pub fn with_environment(&self, env: Environment) -> Self {
        let mut map = self.0.clone();
        map.insert(ENVIRONMENT.to_string(), env.label().to_string());
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}
