use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

/// Statistics for the request coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct CoordinatorStats {
    /// Requests currently in flight
    pub pending_requests: usize,
    /// Debounced calls waiting for their delay to elapse
    pub pending_timers: usize,
    /// Underlying operations started since construction
    pub executions: usize,
    /// Callers that joined a request already in flight instead of starting one
    pub coalesced_waiters: usize,
    /// Start time of the longest running in-flight request
    pub oldest_pending_since: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    executions: AtomicUsize,
    coalesced_waiters: AtomicUsize,
}

impl Counters {
    pub(crate) fn record_execution(&self) {
        self.executions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self) {
        self.coalesced_waiters.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn executions(&self) -> usize {
        self.executions.load(Ordering::Relaxed)
    }

    pub(crate) fn coalesced_waiters(&self) -> usize {
        self.coalesced_waiters.load(Ordering::Relaxed)
    }
}
