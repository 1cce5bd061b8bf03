//! Stack composer
//!
//! Describes the serverless NextJs stack for one environment: a Lambda@Edge
//! function built from the environment's artifact directory, a CloudFront
//! distribution in front of it and an optional custom domain.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AppContext, DomainBinding, Environment, ResourceSettings, Tags};

pub const EDGE_RUNTIME: &str = "nodejs14.x";
pub const EDGE_TIMEOUT_SECS: u32 = 30;
pub const ORIGIN_REQUEST_POLICY_ID: &str = "NextJsAppOriginRequestPolicy";

/// Headers forwarded from the viewer to the origin
pub const FORWARDED_HEADERS: [&str; 4] = ["host", "user-agent", "referer", "x-forwarded-for"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllowedMethods {
    AllowAll,
}

/// Managed CloudFront cache policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachePolicy {
    CachingOptimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    Destroy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRequestPolicy {
    pub id: String,
    pub header_allow_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFunction {
    /// Artifact directory produced by the application build
    pub build_out_dir: String,
    pub description: String,
    pub runtime: String,
    pub memory_mib: u32,
    pub timeout_secs: u32,
    pub with_logging: bool,
}

/// Bucket holding static assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBucket {
    pub auto_delete_objects: bool,
    pub removal_policy: RemovalPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub allowed_methods: AllowedMethods,
    pub cache_policy: CachePolicy,
    pub origin_request_policy: String,
    /// Export carrying the generated CloudFront hostname
    pub domain_export: String,
}

/// Custom domain wiring referencing an existing zone and certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAttachment {
    pub domain_names: Vec<String>,
    pub hosted_zone: HostedZoneRef,
    pub certificate_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZoneRef {
    pub hosted_zone_id: String,
    pub zone_name: String,
}

impl From<&DomainBinding> for DomainAttachment {
    fn from(binding: &DomainBinding) -> Self {
        Self {
            domain_names: vec![binding.domain.clone()],
            hosted_zone: HostedZoneRef {
                hosted_zone_id: binding.hosted_zone_id.clone(),
                zone_name: binding.zone_name.clone(),
            },
            certificate_arn: binding.certificate_arn.clone(),
        }
    }
}

/// Resource graph for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDefinition {
    pub id: String,
    pub environment: Environment,
    pub description: String,
    pub tags: Tags,
    pub origin_request_policy: OriginRequestPolicy,
    pub edge_function: EdgeFunction,
    pub asset_bucket: AssetBucket,
    pub distribution: Distribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainAttachment>,
}

/// Compose the stack for one environment
///
/// `built_at` is stamped into descriptions; passing it in keeps the output
/// deterministic for a given input.
pub fn compose_stack(
    ctx: &AppContext,
    settings: &ResourceSettings,
    built_at: DateTime<Utc>,
) -> StackDefinition {
    let env = settings.environment;
    let timestamp = built_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let domain = settings.domain.as_ref().map(DomainAttachment::from);

    StackDefinition {
        id: format!("serverless-{}", ctx.app_abbr),
        environment: env,
        description: format!(
            "Serverless {} NextJs Lambda Application Built on {}",
            ctx.app_name, timestamp
        ),
        tags: ctx.tags_for(env),
        origin_request_policy: OriginRequestPolicy {
            id: ORIGIN_REQUEST_POLICY_ID.to_string(),
            header_allow_list: FORWARDED_HEADERS.iter().map(|h| h.to_string()).collect(),
        },
        edge_function: EdgeFunction {
            build_out_dir: format!("./{}", env.build_dir()),
            description: format!(
                "Serverless {} NextJs Lambda Function Built on {}",
                ctx.app_name, timestamp
            ),
            runtime: EDGE_RUNTIME.to_string(),
            memory_mib: settings.memory_mib,
            timeout_secs: EDGE_TIMEOUT_SECS,
            with_logging: true,
        },
        asset_bucket: AssetBucket {
            auto_delete_objects: true,
            removal_policy: RemovalPolicy::Destroy,
        },
        distribution: Distribution {
            allowed_methods: AllowedMethods::AllowAll,
            cache_policy: CachePolicy::CachingOptimized,
            origin_request_policy: ORIGIN_REQUEST_POLICY_ID.to_string(),
            domain_export: format!("{}CloudfrontDomain", env.label()),
        },
        domain,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{SourceRepo, Tags};
    use chrono::TimeZone;

    pub(crate) fn context() -> AppContext {
        let config = crate::env::resolve(&crate::env::resolver::tests::complete_vars()).unwrap();
        AppContext::new(&config, "1.4.2")
    }

    pub(crate) fn built_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    pub(crate) fn settings(env: Environment, domain: Option<DomainBinding>) -> ResourceSettings {
        ResourceSettings {
            environment: env,
            memory_mib: env.memory_mib(),
            source: SourceRepo {
                repo_string: "acme/storefront".to_string(),
                branch: "main".to_string(),
                connection_arn: "arn:conn".to_string(),
            },
            domain,
        }
    }

    pub(crate) fn binding() -> DomainBinding {
        DomainBinding {
            domain: "app.example.com".to_string(),
            certificate_arn: "arn:aws:acm:us-east-1:123456789012:certificate/abc".to_string(),
            hosted_zone_id: "Z123".to_string(),
            zone_name: "example.com".to_string(),
        }
    }

    #[test]
    fn test_edge_function() {
        let stack = compose_stack(&context(), &settings(Environment::Production, None), built_at());

        assert_eq!(stack.id, "serverless-nextjs-serverless");
        assert_eq!(stack.edge_function.build_out_dir, "./build-production");
        assert_eq!(stack.edge_function.memory_mib, 1024);
        assert_eq!(stack.edge_function.timeout_secs, 30);
        assert_eq!(stack.edge_function.runtime, "nodejs14.x");
        assert!(stack.edge_function.with_logging);
        assert_eq!(
            stack.edge_function.description,
            "Serverless NextJs Serverless Starter NextJs Lambda Function Built on \
             2026-10-19T12:00:00.000Z"
        );
        assert_eq!(
            stack.description,
            "Serverless NextJs Serverless Starter NextJs Lambda Application Built on \
             2026-10-19T12:00:00.000Z"
        );
        assert_eq!(stack.distribution.domain_export, "productionCloudfrontDomain");
        assert_eq!(stack.tags.get(crate::domain::tags::ENVIRONMENT), Some("production"));
    }

    #[test]
    fn test_header_allow_list() {
        let stack = compose_stack(&context(), &settings(Environment::Staging, None), built_at());
        assert_eq!(
            stack.origin_request_policy.header_allow_list,
            vec!["host", "user-agent", "referer", "x-forwarded-for"]
        );
    }

    #[test]
    fn test_domain_attachment_only_with_binding() {
        let without = compose_stack(&context(), &settings(Environment::Staging, None), built_at());
        assert!(without.domain.is_none());
        let json = serde_json::to_value(&without).unwrap();
        assert!(json.get("domain").is_none());

        let with = compose_stack(
            &context(),
            &settings(Environment::Staging, Some(binding())),
            built_at(),
        );
        let attachment = with.domain.as_ref().unwrap();
        assert_eq!(attachment.domain_names, vec!["app.example.com".to_string()]);
        assert_eq!(attachment.hosted_zone.hosted_zone_id, "Z123");
    }

    #[test]
    fn test_rest_of_graph_unchanged_by_domain() {
        let without = compose_stack(&context(), &settings(Environment::Staging, None), built_at());
        let mut with = compose_stack(
            &context(),
            &settings(Environment::Staging, Some(binding())),
            built_at(),
        );
        with.domain = None;

        assert_eq!(
            serde_json::to_string(&without).unwrap(),
            serde_json::to_string(&with).unwrap()
        );
    }

    #[test]
    fn test_tags_are_not_shared() {
        let ctx = context();
        let staging = compose_stack(&ctx, &settings(Environment::Staging, None), built_at());
        assert_ne!(staging.tags, Tags::default());
        assert_eq!(staging.tags.get("Environment"), Some("staging"));
    }
}
