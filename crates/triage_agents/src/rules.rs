//! Keyword rule tables shared by the built-in agents.
//!
//! Each agent declares an ordered list of [`ClassificationRule`]s and
//! [`HandoffTrigger`]s. Rules are evaluated top to bottom and the first rule
//! whose keyword group matches wins, so more specific groups must come first.

use triage_events::{Priority, Ticket};

use crate::roles::{AgentCapability, AgentRole};
use crate::traits::{AgentAnalysis, Complexity};

/// One keyword group and the classification it implies.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub complexity: Complexity,
    pub priority: Priority,
    pub estimated_time: &'static str,
    pub actions: &'static [&'static str],
}

impl ClassificationRule {
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Keyword group that points at another role.
#[derive(Debug, Clone, Copy)]
pub struct HandoffTrigger {
    pub keywords: &'static [&'static str],
    pub target: AgentRole,
}

impl HandoffTrigger {
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// First matching rule, or `fallback` when none matches.
pub fn classify<'a>(
    text: &str,
    rules: &'a [ClassificationRule],
    fallback: &'a ClassificationRule,
) -> &'a ClassificationRule {
    rules.iter().find(|r| r.matches(text)).unwrap_or(fallback)
}

/// First trigger that matches and points somewhere other than `current`.
pub fn handoff_target(text: &str, triggers: &[HandoffTrigger], current: AgentRole) -> Option<AgentRole> {
    triggers
        .iter()
        .find(|t| t.target != current && t.matches(text))
        .map(|t| t.target)
}

/// Confidence from the number of capability keywords found in the ticket.
pub fn keyword_confidence(matched: usize) -> f64 {
    match matched {
        0 => 0.2,
        n => (0.5 + 0.15 * n as f64).min(0.95),
    }
}

/// Build the analysis for a ticket from a matched rule.
///
/// The suggested priority never drops below the priority already on the ticket.
pub fn analysis_from_rule(
    capability: &AgentCapability,
    ticket: &Ticket,
    text: &str,
    rule: &ClassificationRule,
) -> AgentAnalysis {
    let matched = capability.matched_keywords(text);
    let priority = rule.priority.max(ticket.priority);

    AgentAnalysis::new(capability.role, rule.complexity, priority)
        .with_confidence(keyword_confidence(matched.len()))
        .with_estimated_time(rule.estimated_time)
        .with_actions(rule.actions.iter().copied())
        .with_summary(format!(
            "{}: {} ({} complexity)",
            capability.display_name, rule.name, rule.complexity
        ))
        .with_matched_keywords(matched)
}
