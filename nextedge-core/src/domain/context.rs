//! Application context
//!
//! Values every composer needs (names, account, version, tags), threaded
//! explicitly instead of looked up from a shared app object.

use serde::{Deserialize, Serialize};

use super::{Environment, Tags};
use crate::env::EnvironmentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppContext {
    pub app_name: String,
    /// Short name used in construct ids
    pub app_abbr: String,
    pub account: String,
    pub region: String,
    pub app_version: String,
    base_tags: Tags,
}

impl AppContext {
    pub fn new(config: &EnvironmentConfig, app_version: impl Into<String>) -> Self {
        let app_version = app_version.into();
        let base_tags = Tags::new(&config.project_tag, &app_version, &config.app_name_tag);
        Self {
            app_name: config.app_name.clone(),
            app_abbr: config.app_abbr.clone(),
            account: config.account_id.clone(),
            region: config.region.clone(),
            app_version,
            base_tags,
        }
    }

    /// Tags for resources belonging to one environment
    pub fn tags_for(&self, env: Environment) -> Tags {
        self.base_tags.with_environment(env)
    }
}
