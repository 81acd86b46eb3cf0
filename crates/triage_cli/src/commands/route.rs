//! Route command - Run a webhook payload through the orchestrator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use triage_core::{ExecutionStatus, Orchestrator, ProcessingResult, RoutingConfig};
use triage_events::{EventSource, NormalizedTicketEvent, Normalizer};

#[derive(Args)]
pub struct RouteArgs {
    /// Payload source: ticketing or task-tracker
    #[arg(short, long, env = "TRIAGE_SOURCE")]
    source: EventSource,

    /// Path to the raw JSON webhook payload
    #[arg(short, long)]
    payload: PathBuf,

    /// Routing config (TOML)
    #[arg(short, long, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the execution as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: RouteArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RoutingConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RoutingConfig::default(),
    };

    let event = read_event(args.source, &args.payload)?;
    info!(
        "Routing {} event {} for ticket {}",
        event.source, event.event_type, event.ticket.id
    );

    let orchestrator = Orchestrator::new(config)?;
    let result = orchestrator.process_webhook_event(event).await;
    orchestrator.audit_tasks().wait_idle().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if result.status == ExecutionStatus::Failed {
        anyhow::bail!(
            "Routing failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

fn read_event(source: EventSource, path: &Path) -> Result<NormalizedTicketEvent> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Payload file not found or unreadable: {}", path.display()))?;
    Normalizer::new()
        .from_json_str(source, &body)
        .with_context(|| format!("Failed to normalize {} payload", source))
}

fn print_summary(result: &ProcessingResult) {
    let icon = match result.status {
        ExecutionStatus::Completed => "✅",
        ExecutionStatus::Failed => "❌",
        _ => "⏳",
    };
    println!("{} Execution {} ({})", icon, result.execution_id, result.status);
    println!("   Workflow: {}", result.workflow_id);
    println!("   Duration: {}ms", result.duration_ms);
    if let Some(reason) = result.stop_reason {
        println!("   Stopped:  {}", reason);
    }
    println!();

    println!("🤖 Agents:");
    for analysis in &result.analysis_history {
        println!(
            "   {} → {} / {} ({:.0}% confidence)",
            analysis.agent_role,
            analysis.complexity,
            analysis.priority,
            analysis.confidence * 100.0
        );
        if !analysis.summary.is_empty() {
            println!("      {}", analysis.summary);
        }
        if !analysis.estimated_time.is_empty() {
            println!("      Estimate: {}", analysis.estimated_time);
        }
    }
    println!();

    if result.final_recommendations.is_empty() {
        println!("📋 No recommendations");
    } else {
        println!("📋 Recommendations:");
        for (i, action) in result.final_recommendations.iter().enumerate() {
            println!("   {}. {}", i + 1, action);
        }
    }

    if let Some(error) = &result.error {
        println!();
        println!("⚠️  {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_ticketing_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "ticket.created", "ticket": {{"id": 7, "subject": "Site down", "priority": "urgent"}}}}"#
        )
        .unwrap();

        let event = read_event(EventSource::Ticketing, file.path()).unwrap();
        assert_eq!(event.ticket.id, "7");
        assert_eq!(event.event_type, "ticket.created");
    }

    #[test]
    fn test_missing_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_event(EventSource::Ticketing, &dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_payload_keeps_event_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "ticket.created"}}"#).unwrap();

        let err = read_event(EventSource::Ticketing, file.path()).unwrap_err();
        assert!(err.downcast_ref::<triage_events::EventError>().is_some());
    }
}
