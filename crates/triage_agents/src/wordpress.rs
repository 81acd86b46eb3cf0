//! WordPress developer agent for CMS, plugin and WooCommerce tickets.
//!
//! Store problems (checkout, payments, carts) stay with this agent through its
//! e-commerce branch; custom development and hosting work is handed off.

use async_trait::async_trait;
use tracing::debug;

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};
use crate::rules::{analysis_from_rule, classify, handoff_target, ClassificationRule, HandoffTrigger};
use crate::traits::{Agent, AgentAnalysis, Complexity};

const ECOMMERCE_KEYWORDS: &[&str] = &["woocommerce", "checkout", "payment", "cart", "stripe", "paypal"];

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "e-commerce issue",
        keywords: ECOMMERCE_KEYWORDS,
        complexity: Complexity::Medium,
        priority: Priority::High,
        estimated_time: "4-8 hours",
        actions: &[
            "Reproduce the checkout flow on staging",
            "Check WooCommerce and payment gateway logs",
            "Review recent plugin updates for conflicts",
        ],
    },
    ClassificationRule {
        name: "custom development",
        keywords: &["custom api", "api development", "custom plugin", "custom development", "database design"],
        complexity: Complexity::Complex,
        priority: Priority::Normal,
        estimated_time: "3-5 days",
        actions: &[
            "Scope the custom development work",
            "Document integration points with WordPress",
        ],
    },
    ClassificationRule {
        name: "plugin or theme issue",
        keywords: &["plugin", "theme", "elementor", "gutenberg", "shortcode"],
        complexity: Complexity::Medium,
        priority: Priority::Normal,
        estimated_time: "2-4 hours",
        actions: &[
            "Deactivate plugins to isolate the conflict",
            "Switch to a default theme to rule out theme issues",
        ],
    },
    ClassificationRule {
        name: "content update",
        keywords: &["content", "page", "menu", "image", "post"],
        complexity: Complexity::Simple,
        priority: Priority::Low,
        estimated_time: "30-60 minutes",
        actions: &["Apply the content change in wp-admin"],
    },
];

const FALLBACK: ClassificationRule = ClassificationRule {
    name: "general WordPress support",
    keywords: &[],
    complexity: Complexity::Simple,
    priority: Priority::Normal,
    estimated_time: "1-2 hours",
    actions: &["Review the site health report in wp-admin"],
};

const HANDOFFS: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["custom api", "api development", "database design", "custom development", "backend"],
        target: AgentRole::SoftwareEngineer,
    },
    HandoffTrigger {
        keywords: &["deployment", "server", "hosting", "ssl", "dns", "migration"],
        target: AgentRole::DevOps,
    },
];

const HANDOFF_CUES: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["comprehensive testing", "cross-browser testing"],
        target: AgentRole::QaTester,
    },
    HandoffTrigger {
        keywords: &["security audit", "malware"],
        target: AgentRole::SoftwareEngineer,
    },
];

/// CMS and plugin support agent.
pub struct WordPressAgent {
    capability: AgentCapability,
}

impl WordPressAgent {
    pub fn new(capability: AgentCapability) -> Self {
        Self { capability }
    }

    /// Whether the ticket concerns the store rather than the CMS.
    pub fn is_ecommerce(text: &str) -> bool {
        ECOMMERCE_KEYWORDS.iter().any(|k| text.contains(k))
    }
}

#[async_trait]
impl Agent for WordPressAgent {
    fn capability(&self) -> &AgentCapability {
        &self.capability
    }

    async fn analyze(&self, ticket: &Ticket) -> AgentResult<AgentAnalysis> {
        let text = ticket.searchable_text();
        let rule = classify(&text, RULES, &FALLBACK);
        let mut analysis = analysis_from_rule(&self.capability, ticket, &text, rule);

        // Store tickets are handled in-house even when they mention servers or payments.
        let next = if Self::is_ecommerce(&text) {
            debug!("Ticket {} kept on the e-commerce branch", ticket.id);
            None
        } else {
            handoff_target(&text, HANDOFFS, self.role())
        };
        analysis = analysis.with_next_agent(next);

        Ok(analysis)
    }

    fn should_handoff(&self, ticket: &Ticket) -> Option<AgentRole> {
        handoff_target(&ticket.searchable_text(), HANDOFF_CUES, self.role())
    }
}
