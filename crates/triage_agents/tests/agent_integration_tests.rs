//! Behaviour shared by every built-in agent.

use triage_agents::{
    AgentRegistry, AgentRole, AnalysisOutcome, CapabilityRegistry, MAX_RECOMMENDED_ACTIONS,
};
use triage_events::{Priority, Ticket};

fn tickets() -> Vec<Ticket> {
    vec![
        Ticket::new(
            "1",
            "WordPress plugin conflict",
            "causing checkout errors on WooCommerce",
        ),
        Ticket::new("2", "Site is down", "502 from the load balancer after deploy"),
        Ticket::new("3", "Quarterly KPI dashboard", "requirements for the new report"),
        Ticket::new("4", "API returns 500", "backend bug in the orders integration"),
        Ticket::new("5", "Thanks", "all good now"),
        Ticket::new("6", "Please verify the fix", "regression suite and test plan needed")
            .with_priority(Priority::Urgent),
    ]
}

#[tokio::test]
async fn test_analysis_is_deterministic() {
    let capabilities = CapabilityRegistry::standard();
    let first = AgentRegistry::standard(&capabilities).unwrap();
    let second = AgentRegistry::standard(&capabilities).unwrap();

    for ticket in tickets() {
        for role in AgentRole::all() {
            let a = first.get_required(role).unwrap();
            let b = second.get_required(role).unwrap();

            assert_eq!(
                a.analyze(&ticket).await.unwrap(),
                b.analyze(&ticket).await.unwrap(),
                "{} on ticket {}",
                role,
                ticket.id
            );
            assert_eq!(a.should_handoff(&ticket), b.should_handoff(&ticket));
            assert_eq!(a.can_handle(&ticket), b.can_handle(&ticket));
        }
    }
}

#[tokio::test]
async fn test_analysis_shape_holds_for_every_agent() {
    let registry = AgentRegistry::standard(&CapabilityRegistry::standard()).unwrap();

    for ticket in tickets() {
        for role in registry.roles() {
            let agent = registry.get_required(role).unwrap();
            let analysis = agent.analyze(&ticket).await.unwrap();

            assert_eq!(analysis.agent_role, role);
            assert_eq!(analysis.outcome, AnalysisOutcome::Completed);
            assert!((0.0..=1.0).contains(&analysis.confidence));
            assert!(!analysis.recommended_actions.is_empty());
            assert!(analysis.recommended_actions.len() <= MAX_RECOMMENDED_ACTIONS);
            assert!(!analysis.estimated_time.is_empty());
            assert!(analysis.priority >= ticket.priority);
            assert_ne!(analysis.next_agent, Some(role));
            assert_ne!(agent.should_handoff(&ticket), Some(role));
        }
    }
}

#[test]
fn test_can_handle_follows_capability_keywords() {
    let registry = AgentRegistry::standard(&CapabilityRegistry::standard()).unwrap();
    let ticket = Ticket::new("7", "Kubernetes pipeline", "nothing else");

    assert!(registry.get_required(AgentRole::DevOps).unwrap().can_handle(&ticket));
    assert!(!registry
        .get_required(AgentRole::WordPressDeveloper)
        .unwrap()
        .can_handle(&ticket));
}
