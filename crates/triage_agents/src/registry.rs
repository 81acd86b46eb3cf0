//! Registry of agent implementations keyed by role.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::analyst::AnalystAgent;
use crate::devops::DevOpsAgent;
use crate::error::{AgentError, AgentResult};
use crate::project_manager::ProjectManagerAgent;
use crate::roles::{AgentRole, CapabilityRegistry};
use crate::software_engineer::SoftwareEngineerAgent;
use crate::tester::TesterAgent;
use crate::traits::Agent;
use crate::wordpress::WordPressAgent;

/// Maps each role to the agent that handles it.
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentRole, Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
        }
    }

    /// Registry with the six built-in agents, each built from its capability entry.
    pub fn standard(capabilities: &CapabilityRegistry) -> AgentResult<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(WordPressAgent::new(
            capabilities.get(AgentRole::WordPressDeveloper)?.clone(),
        )));
        registry.register(Arc::new(ProjectManagerAgent::new(
            capabilities.get(AgentRole::ProjectManager)?.clone(),
        )));
        registry.register(Arc::new(SoftwareEngineerAgent::new(
            capabilities.get(AgentRole::SoftwareEngineer)?.clone(),
        )));
        registry.register(Arc::new(DevOpsAgent::new(
            capabilities.get(AgentRole::DevOps)?.clone(),
        )));
        registry.register(Arc::new(TesterAgent::new(
            capabilities.get(AgentRole::QaTester)?.clone(),
        )));
        registry.register(Arc::new(AnalystAgent::new(
            capabilities.get(AgentRole::BusinessAnalyst)?.clone(),
        )));
        Ok(registry)
    }

    /// Register an agent under its role, replacing any previous entry.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        let role = agent.role();
        debug!("Registering agent: {}", role);
        self.agents.insert(role, agent);
    }

    /// Get an agent by role.
    pub fn get(&self, role: AgentRole) -> Option<Arc<dyn Agent>> {
        self.agents.get(&role).cloned()
    }

    /// Get an agent by role, returning an error if not registered.
    pub fn get_required(&self, role: AgentRole) -> AgentResult<Arc<dyn Agent>> {
        self.get(role).ok_or(AgentError::NotFound(role))
    }

    /// Registered roles in role order.
    pub fn roles(&self) -> Vec<AgentRole> {
        self.agents.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}
