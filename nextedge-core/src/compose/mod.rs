//! Resource graph composition
//!
//! Functions that turn settings into serialisable descriptions of stacks,
//! pipelines and notification wiring for the provisioning engine.

pub mod notification;
pub mod pipeline;
pub mod stack;

pub use notification::{NotificationFanout, compose_notifications};
pub use pipeline::{
    Phase, PipelineDefinition, ShellStep, StageDeployment, StageOptions, Step,
    compose_production_pipeline, compose_staging_pipeline,
};
pub use stack::{StackDefinition, compose_stack};
