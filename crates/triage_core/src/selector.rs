//! Agent selection by weighted keyword overlap.
//!
//! `score = matched / |keywords| * weight`. Candidates scoring at or below the
//! confidence floor are discarded; the highest remaining score wins, ties go to
//! the lower capability priority and then to role order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use triage_agents::{AgentCapability, AgentRole, CapabilityRegistry};
use triage_events::Ticket;

use crate::config::DEFAULT_CONFIDENCE_FLOOR;

/// One candidate's selector score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub role: AgentRole,
    pub score: f64,
    pub priority: u32,
    pub matched_keywords: Vec<String>,
}

impl CandidateScore {
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| self.role.cmp(&other.role))
    }
}

/// Scores candidate roles against a ticket.
#[derive(Debug, Clone)]
pub struct AgentSelector {
    capabilities: CapabilityRegistry,
    floor: f64,
}

impl Default for AgentSelector {
    fn default() -> Self {
        Self::new(CapabilityRegistry::standard())
    }
}

impl AgentSelector {
    pub fn new(capabilities: CapabilityRegistry) -> Self {
        Self {
            capabilities,
            floor: DEFAULT_CONFIDENCE_FLOOR,
        }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// Raw score of one capability against lowercased ticket text.
    pub fn score(capability: &AgentCapability, text: &str) -> (f64, Vec<String>) {
        if capability.keywords.is_empty() {
            return (0.0, Vec::new());
        }
        let matched = capability.matched_keywords(text);
        let score = matched.len() as f64 / capability.keywords.len() as f64 * capability.weight;
        (score, matched)
    }

    /// Candidates that clear the floor, best first.
    ///
    /// Roles without a capability entry are skipped.
    pub fn ranked(&self, ticket: &Ticket, candidates: &BTreeSet<AgentRole>) -> Vec<CandidateScore> {
        let text = ticket.searchable_text();
        let mut scored: Vec<CandidateScore> = candidates
            .iter()
            .filter_map(|role| self.capabilities.get(*role).ok())
            .map(|capability| {
                let (score, matched_keywords) = Self::score(capability, &text);
                CandidateScore {
                    role: capability.role,
                    score,
                    priority: capability.priority,
                    matched_keywords,
                }
            })
            .filter(|c| c.score > self.floor)
            .collect();

        scored.sort_by(|a, b| a.rank(b));
        scored
    }

    /// Best candidate, or `None` when nobody clears the floor.
    pub fn select(&self, ticket: &Ticket, candidates: &BTreeSet<AgentRole>) -> Option<AgentRole> {
        let ranked = self.ranked(ticket, candidates);
        match ranked.first() {
            Some(best) => {
                debug!(
                    "Selected {} for ticket {} (score {:.3}, {} candidates qualified)",
                    best.role,
                    ticket.id,
                    best.score,
                    ranked.len()
                );
                Some(best.role)
            }
            None => {
                debug!("No agent cleared the floor for ticket {}", ticket.id);
                None
            }
        }
    }
}
