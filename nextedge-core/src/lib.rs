//! NextEdge Core
//!
//! Configuration and composition logic for deploying a server-rendered
//! NextJs application to CloudFront with Lambda@Edge.
//!
//! This crate contains:
//! - Env: Loading and validating deployment variables
//! - Domain: Resource settings, tags and application context
//! - Compose: Stack, pipeline and notification graph descriptions
//!
//! Everything here is pure data construction. Builds, HTTP checks and
//! writing the cloud assembly live in the CLI and client crates.

pub mod compose;
pub mod domain;
pub mod env;
pub mod error;

pub use error::ConfigError;
