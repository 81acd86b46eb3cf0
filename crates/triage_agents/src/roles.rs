//! Agent role definitions and capability registry.
//!
//! The role set is closed: every [`AgentRole`] has exactly one
//! [`AgentCapability`] entry, loaded once at startup and never mutated.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// Support agent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    WordPressDeveloper,
    ProjectManager,
    SoftwareEngineer,
    DevOps,
    QaTester,
    BusinessAnalyst,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::WordPressDeveloper => "wordpress_developer",
            AgentRole::ProjectManager => "project_manager",
            AgentRole::SoftwareEngineer => "software_engineer",
            AgentRole::DevOps => "devops",
            AgentRole::QaTester => "qa_tester",
            AgentRole::BusinessAnalyst => "business_analyst",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::WordPressDeveloper => "WordPress Developer",
            AgentRole::ProjectManager => "Project Manager",
            AgentRole::SoftwareEngineer => "Software Engineer",
            AgentRole::DevOps => "DevOps Engineer",
            AgentRole::QaTester => "QA Tester",
            AgentRole::BusinessAnalyst => "Business Analyst",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentRole::WordPressDeveloper => "CMS, plugin, theme and WooCommerce support",
            AgentRole::ProjectManager => "Coordinates work and handles unclassified tickets",
            AgentRole::SoftwareEngineer => "Custom development, APIs, databases and bugs",
            AgentRole::DevOps => "Deployments, hosting, pipelines and infrastructure",
            AgentRole::QaTester => "Reproduction, regression and test automation",
            AgentRole::BusinessAnalyst => "Requirements, processes and reporting",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            AgentRole::WordPressDeveloper,
            AgentRole::ProjectManager,
            AgentRole::SoftwareEngineer,
            AgentRole::DevOps,
            AgentRole::QaTester,
            AgentRole::BusinessAnalyst,
        ]
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AgentRole::all()
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| AgentError::UnknownRole(s.to_string()))
    }
}

/// Static routing data for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCapability {
    pub role: AgentRole,
    pub display_name: String,
    /// Lowercase keywords matched as substrings of the ticket text
    pub keywords: BTreeSet<String>,
    pub specialties: Vec<String>,
    /// Minimum analysis confidence the agent considers reliable, in `[0, 1]`
    pub confidence_threshold: f64,
    /// Lower is preferred on selector ties
    pub priority: u32,
    /// Selector score multiplier
    pub weight: f64,
    pub max_processing_time_ms: u64,
}

impl AgentCapability {
    pub fn new(role: AgentRole) -> Self {
        Self {
            role,
            display_name: role.display_name().to_string(),
            keywords: BTreeSet::new(),
            specialties: Vec::new(),
            confidence_threshold: 0.5,
            priority: 10,
            weight: 1.0,
            max_processing_time_ms: 5_000,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn with_specialties<I, S>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specialties = specialties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_max_processing_time_ms(mut self, ms: u64) -> Self {
        self.max_processing_time_ms = ms;
        self
    }

    /// Keywords found in already-lowercased text, in keyword order.
    pub fn matched_keywords(&self, text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .cloned()
            .collect()
    }
}

/// Closed table of capabilities, one per role.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<AgentRole, AgentCapability>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CapabilityRegistry {
    /// Build a registry, rejecting duplicate or missing roles.
    pub fn from_capabilities(
        capabilities: impl IntoIterator<Item = AgentCapability>,
    ) -> AgentResult<Self> {
        let mut table = BTreeMap::new();
        for capability in capabilities {
            let role = capability.role;
            if table.insert(role, capability).is_some() {
                return Err(AgentError::InvalidCapability(format!(
                    "duplicate entry for role {}",
                    role
                )));
            }
        }

        let missing: Vec<_> = AgentRole::all()
            .into_iter()
            .filter(|role| !table.contains_key(role))
            .map(|role| role.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AgentError::InvalidCapability(format!(
                "missing roles: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            capabilities: table,
        })
    }

    /// Replace the entry for the capability's role.
    pub fn with_capability(mut self, capability: AgentCapability) -> Self {
        self.capabilities.insert(capability.role, capability);
        self
    }

    pub fn get(&self, role: AgentRole) -> AgentResult<&AgentCapability> {
        self.capabilities.get(&role).ok_or(AgentError::NotFound(role))
    }

    pub fn all_roles(&self) -> BTreeSet<AgentRole> {
        self.capabilities.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentCapability> {
        self.capabilities.values()
    }

    /// The built-in capability table.
    pub fn standard() -> Self {
        let capabilities = vec![
            AgentCapability::new(AgentRole::WordPressDeveloper)
                .with_keywords([
                    "wordpress",
                    "plugin",
                    "theme",
                    "woocommerce",
                    "elementor",
                    "gutenberg",
                    "wp-admin",
                    "shortcode",
                ])
                .with_specialties(["plugin conflicts", "theme customization", "woocommerce stores"])
                .with_confidence_threshold(0.6)
                .with_priority(1)
                .with_max_processing_time_ms(5_000),
            AgentCapability::new(AgentRole::SoftwareEngineer)
                .with_keywords([
                    "api",
                    "database",
                    "backend",
                    "bug",
                    "code",
                    "development",
                    "architecture",
                    "integration",
                    "refactor",
                    "algorithm",
                ])
                .with_specialties(["custom development", "api design", "data modelling"])
                .with_confidence_threshold(0.7)
                .with_priority(2)
                .with_max_processing_time_ms(8_000),
            AgentCapability::new(AgentRole::DevOps)
                .with_keywords([
                    "deploy",
                    "server",
                    "docker",
                    "kubernetes",
                    "ci/cd",
                    "pipeline",
                    "infrastructure",
                    "hosting",
                    "ssl",
                    "dns",
                    "monitoring",
                    "outage",
                ])
                .with_specialties(["deployments", "hosting", "observability"])
                .with_confidence_threshold(0.7)
                .with_priority(3)
                .with_max_processing_time_ms(6_000),
            AgentCapability::new(AgentRole::QaTester)
                .with_keywords([
                    "test",
                    "testing",
                    "qa",
                    "regression",
                    "automation",
                    "quality",
                    "verify",
                    "reproduce",
                ])
                .with_specialties(["regression testing", "test automation", "bug reproduction"])
                .with_confidence_threshold(0.6)
                .with_priority(4)
                .with_max_processing_time_ms(5_000),
            AgentCapability::new(AgentRole::BusinessAnalyst)
                .with_keywords([
                    "requirements",
                    "analysis",
                    "report",
                    "process",
                    "kpi",
                    "workflow",
                    "specification",
                    "dashboard",
                    "analytics",
                ])
                .with_specialties(["requirements gathering", "process mapping", "reporting"])
                .with_confidence_threshold(0.6)
                .with_priority(5)
                .with_max_processing_time_ms(5_000),
            AgentCapability::new(AgentRole::ProjectManager)
                .with_keywords([
                    "project",
                    "timeline",
                    "deadline",
                    "milestone",
                    "scope",
                    "planning",
                    "coordination",
                    "budget",
                    "roadmap",
                ])
                .with_specialties(["coordination", "planning", "triage"])
                .with_confidence_threshold(0.5)
                .with_priority(6)
                .with_max_processing_time_ms(3_000),
        ];

        Self {
            capabilities: capabilities.into_iter().map(|c| (c.role, c)).collect(),
        }
    }
}
