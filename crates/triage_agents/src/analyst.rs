//! Business analyst agent for requirements, process and reporting tickets.

use async_trait::async_trait;

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};
use crate::rules::{analysis_from_rule, classify, handoff_target, ClassificationRule, HandoffTrigger};
use crate::traits::{Agent, AgentAnalysis, Complexity};

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "requirements definition",
        keywords: &["requirements", "specification", "user story", "user stories", "scope of work"],
        complexity: Complexity::Complex,
        priority: Priority::Normal,
        estimated_time: "2-4 days",
        actions: &[
            "Run a requirements workshop with stakeholders",
            "Write user stories with acceptance criteria",
        ],
    },
    ClassificationRule {
        name: "reporting request",
        keywords: &["report", "dashboard", "kpi", "analytics", "metrics"],
        complexity: Complexity::Medium,
        priority: Priority::Normal,
        estimated_time: "1-2 days",
        actions: &[
            "Confirm data sources and metric definitions",
            "Mock up the report layout for sign-off",
        ],
    },
    ClassificationRule {
        name: "process improvement",
        keywords: &["process", "workflow", "approval", "handover"],
        complexity: Complexity::Medium,
        priority: Priority::Low,
        estimated_time: "1-3 days",
        actions: &[
            "Map the current process end to end",
            "Identify bottlenecks and propose changes",
        ],
    },
];

const FALLBACK: ClassificationRule = ClassificationRule {
    name: "business clarification",
    keywords: &[],
    complexity: Complexity::Simple,
    priority: Priority::Normal,
    estimated_time: "1-2 hours",
    actions: &["Clarify the business goal with the requester"],
};

const HANDOFFS: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["implementation", "build the feature", "integration"],
        target: AgentRole::SoftwareEngineer,
    },
    HandoffTrigger {
        keywords: &["timeline", "budget", "deadline"],
        target: AgentRole::ProjectManager,
    },
];

const HANDOFF_CUES: &[HandoffTrigger] = &[HandoffTrigger {
    keywords: &["validation plan", "comprehensive testing"],
    target: AgentRole::QaTester,
}];

/// Requirements and reporting agent.
pub struct AnalystAgent {
    capability: AgentCapability,
}

impl AnalystAgent {
    pub fn new(capability: AgentCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl Agent for AnalystAgent {
    fn capability(&self) -> &AgentCapability {
        &self.capability
    }

    async fn analyze(&self, ticket: &Ticket) -> AgentResult<AgentAnalysis> {
        let text = ticket.searchable_text();
        let rule = classify(&text, RULES, &FALLBACK);

        Ok(analysis_from_rule(&self.capability, ticket, &text, rule)
            .with_next_agent(handoff_target(&text, HANDOFFS, self.role())))
    }

    fn should_handoff(&self, ticket: &Ticket) -> Option<AgentRole> {
        handoff_target(&ticket.searchable_text(), HANDOFF_CUES, self.role())
    }
}
