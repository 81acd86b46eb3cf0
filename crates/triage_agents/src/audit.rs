//! Audit trail for agent analyses and execution outcomes.
//!
//! Writes are scheduled on [`DetachedTasks`] and never awaited by the caller.
//! A failed write is logged and dropped; it never affects routing.

use std::collections::HashMap;
use std::future::poll_fn;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::AgentResult;
use crate::roles::AgentRole;

/// Kind of audit record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// One agent's analysis within an execution.
    Analysis(AgentRole),
    /// Final execution record.
    Execution,
}

impl AuditKind {
    pub fn as_key(&self) -> String {
        match self {
            Self::Analysis(role) => format!("analysis:{}", role.as_str()),
            Self::Execution => "execution".to_string(),
        }
    }
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub ticket_id: String,
    pub kind: AuditKind,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(ticket_id: impl Into<String>, kind: AuditKind, payload: serde_json::Value) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            kind,
            payload,
            recorded_at: Utc::now(),
        }
    }

    /// Storage key: `(ticket_id, kind)`.
    pub fn key(&self) -> (String, String) {
        (self.ticket_id.clone(), self.kind.as_key())
    }
}

/// Destination for audit records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Persist an entry. A later entry with the same key replaces the earlier one.
    async fn record(&self, entry: AuditEntry) -> AgentResult<()>;
}

/// Audit trail kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditTrail {
    entries: RwLock<HashMap<(String, String), AuditEntry>>,
}

impl InMemoryAuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, ticket_id: &str, kind: &AuditKind) -> Option<AuditEntry> {
        let entries = self.entries.read().await;
        entries
            .get(&(ticket_id.to_string(), kind.as_key()))
            .cloned()
    }

    /// All entries for a ticket, sorted by kind key.
    pub async fn for_ticket(&self, ticket_id: &str) -> Vec<AuditEntry> {
        let entries = self.entries.read().await;
        let mut found: Vec<AuditEntry> = entries
            .values()
            .filter(|e| e.ticket_id == ticket_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.kind.as_key());
        found
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditTrail for InMemoryAuditTrail {
    async fn record(&self, entry: AuditEntry) -> AgentResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.key(), entry);
        Ok(())
    }
}

/// Tracked set of spawned background tasks.
///
/// `spawn` returns immediately; `wait_idle` resolves once every task spawned so
/// far (including ones spawned while waiting) has finished.
#[derive(Debug, Default)]
pub struct DetachedTasks {
    tasks: Mutex<JoinSet<()>>,
}

impl DetachedTasks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawn a task without awaiting it. Must be called from within a tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock();
        // Reap finished tasks so the set does not grow without bound.
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Wait until no detached task is running.
    ///
    /// Tasks are joined in place, so dropping this future early leaves the
    /// remaining ones running and counted by `pending`.
    pub async fn wait_idle(&self) {
        while let Some(result) = poll_fn(|cx| self.lock().poll_join_next(cx)).await {
            if let Err(e) = result {
                warn!("Detached task did not complete: {}", e);
            }
        }
    }
}

/// Schedule an audit write on `tasks`. Failures are logged at warn and dropped.
pub fn record_detached(tasks: &DetachedTasks, trail: Arc<dyn AuditTrail>, entry: AuditEntry) {
    let key = entry.kind.as_key();
    let ticket_id = entry.ticket_id.clone();
    debug!("Scheduling audit write {} for ticket {}", key, ticket_id);

    tasks.spawn(async move {
        if let Err(e) = trail.record(entry).await {
            warn!("Audit write {} for ticket {} failed: {}", key, ticket_id, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_kind_keys() {
        assert_eq!(
            AuditKind::Analysis(AgentRole::QaTester).as_key(),
            "analysis:qa_tester"
        );
        assert_eq!(AuditKind::Execution.to_string(), "execution");
    }

    #[tokio::test]
    async fn test_in_memory_trail_replaces_same_key() {
        let trail = InMemoryAuditTrail::new();
        trail
            .record(AuditEntry::new("t-1", AuditKind::Execution, json!({"v": 1})))
            .await
            .unwrap();
        trail
            .record(AuditEntry::new("t-1", AuditKind::Execution, json!({"v": 2})))
            .await
            .unwrap();
        trail
            .record(AuditEntry::new(
                "t-1",
                AuditKind::Analysis(AgentRole::DevOps),
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(trail.len().await, 2);
        let entry = trail.get("t-1", &AuditKind::Execution).await.unwrap();
        assert_eq!(entry.payload["v"], 2);

        let all = trail.for_ticket("t-1").await;
        assert_eq!(all[0].kind, AuditKind::Analysis(AgentRole::DevOps));
        assert!(trail.for_ticket("t-2").await.is_empty());
    }

    #[tokio::test]
    async fn test_detached_write_reaches_trail() {
        let tasks = DetachedTasks::new();
        let trail = Arc::new(InMemoryAuditTrail::new());

        record_detached(
            &tasks,
            trail.clone(),
            AuditEntry::new("t-9", AuditKind::Execution, json!({"status": "completed"})),
        );
        tasks.wait_idle().await;

        assert!(trail.get("t-9", &AuditKind::Execution).await.is_some());
        assert_eq!(tasks.pending(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_is_swallowed() {
        let mut mock = MockAuditTrail::new();
        mock.expect_record()
            .times(1)
            .returning(|_| Err(AgentError::Audit("disk full".into())));

        let tasks = DetachedTasks::new();
        record_detached(
            &tasks,
            Arc::new(mock),
            AuditEntry::new("t-3", AuditKind::Execution, json!(null)),
        );
        tasks.wait_idle().await;
    }

    #[tokio::test]
    async fn test_wait_idle_covers_every_spawned_task() {
        let tasks = DetachedTasks::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let counter = counter.clone();
            tasks.spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tasks.wait_idle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_cancelled_wait_keeps_tasks_running() {
        let tasks = DetachedTasks::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            tasks.spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(5), tasks.wait_idle()).await;
        assert!(waited.is_err());
        assert_eq!(tasks.pending(), 3);

        tasks.wait_idle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(tasks.pending(), 0);
    }
}
