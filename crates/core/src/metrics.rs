use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Gateway counters. Relaxed ordering; values are only ever read as a
/// snapshot for logs.
#[derive(Default)]
pub struct Metrics {
    invocations: AtomicU64,
    successes: AtomicU64,
    rejected_tools: AtomicU64,
    rejected_inputs: AtomicU64,
    tool_failures: AtomicU64,
    internal_failures: AtomicU64,
    timeouts: AtomicU64,
    session_resets: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_invocations(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_successes(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected_tools(&self) {
        self.rejected_tools.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected_inputs(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_failures(&self) {
        self.tool_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_internal_failures(&self) {
        self.internal_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_timeouts(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_session_resets(&self, count: u64) {
        self.session_resets.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations: self.invocations.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            rejected_tools: self.rejected_tools.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            tool_failures: self.tool_failures.load(Ordering::Relaxed),
            internal_failures: self.internal_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            session_resets: self.session_resets.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Calls that passed lookup and validation and reached a tool.
    pub invocations: u64,
    pub successes: u64,
    pub rejected_tools: u64,
    pub rejected_inputs: u64,
    pub tool_failures: u64,
    pub internal_failures: u64,
    pub timeouts: u64,
    pub session_resets: u64,
}

impl MetricsSnapshot {
    pub fn success_rate(&self) -> f64 {
        if self.invocations == 0 {
            return 1.0;
        }
        self.successes as f64 / self.invocations as f64
    }
}
