//! Aggregate execution metrics.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowMetrics {
    pub total_executions: u64,
    pub successful_executions: u64,
    pub failed_executions: u64,
    pub average_duration_ms: f64,
}

impl WorkflowMetrics {
    pub fn success_rate(&self) -> f64 {
        if self.total_executions == 0 {
            return 0.0;
        }
        self.successful_executions as f64 / self.total_executions as f64
    }
}

#[derive(Debug, Default)]
struct Counters {
    successful: u64,
    failed: u64,
    duration_sum_ms: u64,
}

/// Counters updated once per finished execution.
///
/// All counters sit behind one lock, so a snapshot always satisfies
/// `successful + failed == total`. Starts at zero when the owning
/// orchestrator is created.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    counters: Mutex<Counters>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_success(&self, duration_ms: u64) {
        let mut counters = self.lock();
        counters.successful += 1;
        counters.duration_sum_ms = counters.duration_sum_ms.saturating_add(duration_ms);
    }

    pub fn record_failure(&self, duration_ms: u64) {
        let mut counters = self.lock();
        counters.failed += 1;
        counters.duration_sum_ms = counters.duration_sum_ms.saturating_add(duration_ms);
    }

    pub fn snapshot(&self) -> WorkflowMetrics {
        let counters = self.lock();
        let total = counters.successful + counters.failed;
        WorkflowMetrics {
            total_executions: total,
            successful_executions: counters.successful,
            failed_executions: counters.failed,
            average_duration_ms: if total == 0 {
                0.0
            } else {
                counters.duration_sum_ms as f64 / total as f64
            },
        }
    }

    /// Zero every counter. Intended for test harnesses only.
    pub fn reset(&self) {
        *self.lock() = Counters::default();
    }
}
