//! Routing configuration.
//!
//! Every key is optional; a missing key keeps its default. Example:
//!
//! ```toml
//! workflow_id = "ticket-routing"
//! max_handoffs = 3
//! confidence_floor = 0.3
//! fallback_role = "project_manager"
//! audit_enabled = true
//!
//! [[agent]]
//! role = "devops"
//! max_processing_time_ms = 2000
//! keywords = ["deploy", "server", "kubernetes"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_agents::{AgentRole, CapabilityRegistry};

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_WORKFLOW_ID: &str = "ticket-routing";
pub const DEFAULT_MAX_HANDOFFS: usize = 3;
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.3;
pub const DEFAULT_FALLBACK_ROLE: AgentRole = AgentRole::ProjectManager;

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Identifier stamped on every execution
    pub workflow_id: String,
    /// Maximum number of agents visited per execution
    pub max_handoffs: usize,
    /// Selector scores at or below this value are discarded
    pub confidence_floor: f64,
    /// Role that handles tickets no agent qualifies for
    pub fallback_role: AgentRole,
    /// Record analyses and execution outcomes to the audit trail
    pub audit_enabled: bool,
    /// Per-agent capability overrides
    #[serde(rename = "agent", skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentOverride>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            workflow_id: DEFAULT_WORKFLOW_ID.to_string(),
            max_handoffs: DEFAULT_MAX_HANDOFFS,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            fallback_role: DEFAULT_FALLBACK_ROLE,
            audit_enabled: true,
            agents: Vec::new(),
        }
    }
}

/// Adjustments applied on top of a role's standard capability entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOverride {
    pub role: AgentRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_processing_time_ms: Option<u64>,
}

impl RoutingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        debug!("Loading routing config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.workflow_id.trim().is_empty() {
            return Err(CoreError::Config("workflow_id must not be empty".into()));
        }
        if self.max_handoffs == 0 {
            return Err(CoreError::Config("max_handoffs must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.confidence_floor) {
            return Err(CoreError::Config(format!(
                "confidence_floor must be in [0, 1), got {}",
                self.confidence_floor
            )));
        }
        for agent in &self.agents {
            if matches!(agent.weight, Some(w) if !(w.is_finite() && w > 0.0)) {
                return Err(CoreError::Config(format!(
                    "weight for {} must be a positive number",
                    agent.role
                )));
            }
            if matches!(agent.max_processing_time_ms, Some(0)) {
                return Err(CoreError::Config(format!(
                    "max_processing_time_ms for {} must be positive",
                    agent.role
                )));
            }
            if matches!(&agent.keywords, Some(k) if k.is_empty()) {
                return Err(CoreError::Config(format!(
                    "keywords for {} must not be empty",
                    agent.role
                )));
            }
        }
        Ok(())
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = workflow_id.into();
        self
    }

    pub fn with_max_handoffs(mut self, max_handoffs: usize) -> Self {
        self.max_handoffs = max_handoffs;
        self
    }

    pub fn with_confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = floor;
        self
    }

    pub fn with_fallback_role(mut self, role: AgentRole) -> Self {
        self.fallback_role = role;
        self
    }

    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Standard capability table with this config's overrides applied in order.
    pub fn capabilities(&self) -> CoreResult<CapabilityRegistry> {
        let mut registry = CapabilityRegistry::standard();
        for agent in &self.agents {
            let mut capability = registry.get(agent.role)?.clone();
            if let Some(keywords) = &agent.keywords {
                capability = capability.with_keywords(keywords.iter().map(String::as_str));
            }
            if let Some(weight) = agent.weight {
                capability = capability.with_weight(weight);
            }
            if let Some(threshold) = agent.confidence_threshold {
                capability = capability.with_confidence_threshold(threshold);
            }
            if let Some(priority) = agent.priority {
                capability = capability.with_priority(priority);
            }
            if let Some(ms) = agent.max_processing_time_ms {
                capability = capability.with_max_processing_time_ms(ms);
            }
            registry = registry.with_capability(capability);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RoutingConfig::default();
        assert_eq!(config.workflow_id, "ticket-routing");
        assert_eq!(config.max_handoffs, 3);
        assert_eq!(config.confidence_floor, 0.3);
        assert_eq!(config.fallback_role, AgentRole::ProjectManager);
        assert!(config.audit_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RoutingConfig::from_toml_str("max_handoffs = 5\n").unwrap();
        assert_eq!(config.max_handoffs, 5);
        assert_eq!(config.confidence_floor, DEFAULT_CONFIDENCE_FLOOR);
        assert_eq!(config.fallback_role, DEFAULT_FALLBACK_ROLE);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            RoutingConfig::from_toml_str("max_handoffs = 0"),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            RoutingConfig::from_toml_str("confidence_floor = 1.0"),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            RoutingConfig::from_toml_str("fallback_role = \"janitor\""),
            Err(CoreError::Toml(_))
        ));
        assert!(RoutingConfig::default()
            .with_confidence_floor(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_load_from_file_with_agent_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
workflow_id = "support"
fallback_role = "business_analyst"

[[agent]]
role = "devops"
keywords = ["Pager", "on-call"]
weight = 2.0
max_processing_time_ms = 1500
"#
        )
        .unwrap();

        let config = RoutingConfig::load(file.path()).unwrap();
        assert_eq!(config.workflow_id, "support");
        assert_eq!(config.fallback_role, AgentRole::BusinessAnalyst);

        let capabilities = config.capabilities().unwrap();
        let devops = capabilities.get(AgentRole::DevOps).unwrap();
        assert_eq!(devops.keywords.len(), 2);
        assert!(devops.keywords.contains("pager"));
        assert_eq!(devops.weight, 2.0);
        assert_eq!(devops.max_processing_time_ms, 1500);

        let qa = capabilities.get(AgentRole::QaTester).unwrap();
        assert_eq!(qa, CapabilityRegistry::standard().get(AgentRole::QaTester).unwrap());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RoutingConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[test]
    fn test_builders() {
        let config = RoutingConfig::default()
            .with_workflow_id("wf")
            .with_max_handoffs(1)
            .with_confidence_floor(0.5)
            .with_fallback_role(AgentRole::DevOps)
            .with_audit(false);

        assert_eq!(config.workflow_id, "wf");
        assert_eq!(config.max_handoffs, 1);
        assert_eq!(config.confidence_floor, 0.5);
        assert_eq!(config.fallback_role, AgentRole::DevOps);
        assert!(!config.audit_enabled);
    }
}
