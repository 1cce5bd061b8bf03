//! Notification fan-out
//!
//! An SNS topic per pipeline, one email subscription per address and a
//! CodeStar notification rule publishing execution outcomes to the topic.

use serde::{Deserialize, Serialize};

use crate::domain::{AppContext, Environment};

/// Pipeline execution events published to the topic
pub const PIPELINE_EVENTS: [&str; 3] = [
    "codepipeline-pipeline-pipeline-execution-failed",
    "codepipeline-pipeline-pipeline-execution-canceled",
    "codepipeline-pipeline-pipeline-execution-succeeded",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionProtocol {
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub topic: String,
    pub endpoint: String,
    pub protocol: SubscriptionProtocol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRule {
    pub id: String,
    /// Name of the pipeline whose events are published
    pub source: String,
    pub events: Vec<String>,
    /// Topic ids receiving the events
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFanout {
    pub topic: Topic,
    pub subscriptions: Vec<Subscription>,
    pub rule: NotificationRule,
}

/// Compose the notification wiring for a pipeline
pub fn compose_notifications(
    ctx: &AppContext,
    env: Environment,
    pipeline_name: &str,
    emails: &[String],
) -> NotificationFanout {
    let topic = Topic {
        id: format!("{}-{}-pipeline-topic", ctx.app_abbr, env),
        name: format!("{}-{}-pipeline-notifications", ctx.app_name, env),
    };

    let subscriptions = emails
        .iter()
        .enumerate()
        .map(|(index, email)| Subscription {
            id: format!("{}-{}-pipeline-subscription-{}", ctx.app_abbr, env, index),
            topic: topic.id.clone(),
            endpoint: email.clone(),
            protocol: SubscriptionProtocol::Email,
        })
        .collect();

    let rule = NotificationRule {
        id: format!("{}-{}-pipeline-notification", ctx.app_name, env),
        source: pipeline_name.to_string(),
        events: PIPELINE_EVENTS.iter().map(|e| e.to_string()).collect(),
        targets: vec![topic.id.clone()],
    };

    NotificationFanout {
        topic,
        subscriptions,
        rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::stack::tests::context;

    #[test]
    fn test_one_subscription_per_email() {
        let emails = vec!["ops@example.com".to_string(), "dev@example.com".to_string()];
        let fanout = compose_notifications(&context(), Environment::Staging, "p", &emails);

        assert_eq!(fanout.subscriptions.len(), 2);
        assert_eq!(fanout.subscriptions[1].endpoint, "dev@example.com");
        assert_eq!(
            fanout.subscriptions[1].id,
            "nextjs-serverless-staging-pipeline-subscription-1"
        );
        assert!(
            fanout
                .subscriptions
                .iter()
                .all(|s| s.protocol == SubscriptionProtocol::Email && s.topic == fanout.topic.id)
        );
    }

    #[test]
    fn test_rule_publishes_outcomes_to_topic() {
        let fanout = compose_notifications(&context(), Environment::Staging, "my-pipeline", &[]);

        assert_eq!(fanout.rule.source, "my-pipeline");
        assert_eq!(fanout.rule.targets, vec![fanout.topic.id.clone()]);
        assert_eq!(fanout.rule.events.len(), 3);
        assert!(fanout.rule.events.iter().any(|e| e.ends_with("failed")));
        assert!(fanout.rule.events.iter().any(|e| e.ends_with("canceled")));
        assert!(fanout.rule.events.iter().any(|e| e.ends_with("succeeded")));
        assert!(fanout.subscriptions.is_empty());
        assert_eq!(
            fanout.topic.name,
            "NextJs Serverless Starter-staging-pipeline-notifications"
        );
    }
}
