//! DevOps agent for deployments, hosting and infrastructure tickets.
//!
//! The DevOps agent handles:
//! - Outages and degraded service
//! - Certificates and DNS
//! - Build and deployment pipelines
//! - Capacity and scaling

use async_trait::async_trait;
use tracing::info;

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};
use crate::rules::{analysis_from_rule, classify, handoff_target, ClassificationRule, HandoffTrigger};
use crate::traits::{Agent, AgentAnalysis, Complexity};

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "service outage",
        keywords: &["outage", "site is down", "site down", "502", "503", "unreachable"],
        complexity: Complexity::Complex,
        priority: Priority::Urgent,
        estimated_time: "1-4 hours",
        actions: &[
            "Page the on-call engineer",
            "Check server health and recent deploys",
            "Post a status update for affected customers",
        ],
    },
    ClassificationRule {
        name: "certificate or DNS issue",
        keywords: &["ssl", "certificate", "dns", "domain"],
        complexity: Complexity::Medium,
        priority: Priority::High,
        estimated_time: "1-3 hours",
        actions: &[
            "Verify certificate expiry and chain",
            "Check DNS records and propagation",
        ],
    },
    ClassificationRule {
        name: "pipeline failure",
        keywords: &["ci/cd", "pipeline", "build failed", "deployment", "deploy"],
        complexity: Complexity::Medium,
        priority: Priority::Normal,
        estimated_time: "2-6 hours",
        actions: &[
            "Inspect the failing pipeline stage logs",
            "Roll back to the last good release if needed",
        ],
    },
    ClassificationRule {
        name: "scaling work",
        keywords: &["scaling", "load balancer", "autoscal", "capacity", "kubernetes"],
        complexity: Complexity::Complex,
        priority: Priority::Normal,
        estimated_time: "2-5 days",
        actions: &[
            "Review resource utilisation trends",
            "Plan capacity changes with the team",
        ],
    },
];

const FALLBACK: ClassificationRule = ClassificationRule {
    name: "infrastructure review",
    keywords: &[],
    complexity: Complexity::Simple,
    priority: Priority::Normal,
    estimated_time: "1-2 hours",
    actions: &["Review monitoring dashboards for anomalies"],
};

const HANDOFFS: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["code change", "bug fix", "refactor", "application error"],
        target: AgentRole::SoftwareEngineer,
    },
    HandoffTrigger {
        keywords: &["wordpress", "woocommerce"],
        target: AgentRole::WordPressDeveloper,
    },
];

const HANDOFF_CUES: &[HandoffTrigger] = &[HandoffTrigger {
    keywords: &["load testing", "smoke test", "comprehensive testing"],
    target: AgentRole::QaTester,
}];

/// DevOps agent that handles build, deployment and hosting concerns.
pub struct DevOpsAgent {
    capability: AgentCapability,
}

impl DevOpsAgent {
    pub fn new(capability: AgentCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl Agent for DevOpsAgent {
    fn capability(&self) -> &AgentCapability {
        &self.capability
    }

    async fn analyze(&self, ticket: &Ticket) -> AgentResult<AgentAnalysis> {
        let text = ticket.searchable_text();
        let rule = classify(&text, RULES, &FALLBACK);

        if rule.priority == Priority::Urgent {
            info!("Ticket {} classified as {}", ticket.id, rule.name);
        }

        Ok(analysis_from_rule(&self.capability, ticket, &text, rule)
            .with_next_agent(handoff_target(&text, HANDOFFS, self.role())))
    }

    fn should_handoff(&self, ticket: &Ticket) -> Option<AgentRole> {
        handoff_target(&ticket.searchable_text(), HANDOFF_CUES, self.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::CapabilityRegistry;

    fn agent() -> DevOpsAgent {
        let registry = CapabilityRegistry::standard();
        DevOpsAgent::new(registry.get(AgentRole::DevOps).unwrap().clone())
    }

    #[tokio::test]
    async fn test_outage_is_urgent() {
        let ticket = Ticket::new("1", "Site is down", "Load balancer returns 502");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.priority, Priority::Urgent);
        assert_eq!(analysis.complexity, Complexity::Complex);
        assert_eq!(analysis.recommended_actions.len(), 3);
    }

    #[tokio::test]
    async fn test_certificate_issue() {
        let ticket = Ticket::new("2", "SSL certificate expired", "browser warning on checkout");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.complexity, Complexity::Medium);
        assert_eq!(analysis.priority, Priority::High);
        assert!(analysis.next_agent.is_none());
    }

    #[tokio::test]
    async fn test_wordpress_mention_hands_back() {
        let ticket = Ticket::new("3", "Deployment of WordPress site", "pipeline keeps failing");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.next_agent, Some(AgentRole::WordPressDeveloper));
    }

    #[test]
    fn test_should_handoff_load_testing() {
        let ticket = Ticket::new("4", "New cluster", "please run load testing before cutover");
        assert_eq!(agent().should_handoff(&ticket), Some(AgentRole::QaTester));
    }
}
