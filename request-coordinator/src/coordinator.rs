use crate::config::CoordinatorConfig;
use crate::debounce::{Debounced, TimerRegistry};
use crate::stats::{CoordinatorStats, Counters};
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

type SharedOutcome<T> = Shared<BoxFuture<'static, T>>;

/// Represents a request in flight
struct PendingEntry<T> {
    id: u64,
    started_at: DateTime<Utc>,
    // Weak so that a request every caller gave up on is dropped, not kept alive by the map
    outcome: WeakShared<BoxFuture<'static, T>>,
}

/// Removes a pending entry once its request settles or is dropped.
///
/// Only the entry it was created for is removed; a newer request registered
/// under the same key after a `clear` is left alone.
struct PendingRelease<T> {
    registry: Arc<DashMap<String, PendingEntry<T>>>,
    key: String,
    id: u64,
}

impl<T> Drop for PendingRelease<T> {
    fn drop(&mut self) {
        if self
            .registry
            .remove_if(&self.key, |_, entry| entry.id == self.id)
            .is_some()
        {
            log::debug!("Released pending request for key: {:?}", self.key);
        }
    }
}

/// A burst of debounced requests sharing one outcome
struct BurstEntry<T> {
    id: u64,
    settle: oneshot::Sender<T>,
    outcome: Shared<BoxFuture<'static, Option<T>>>,
}

/// Request deduplication and debouncing keyed by caller-chosen strings.
///
/// When several identical requests are in flight only the first one is
/// executed and its outcome is shared with every caller. Bursts of calls can
/// additionally be debounced so that only the last call of the burst runs.
///
/// The outcome type `T` is shared as is, so a failing operation (a `Result`
/// holding an error) reaches every waiting caller unchanged.
///
/// Clones share the same registries. Build one per application (or per test)
/// with [`RequestCoordinator::new`] and release it with
/// [`RequestCoordinator::dispose`].
pub struct RequestCoordinator<T> {
    pending: Arc<DashMap<String, PendingEntry<T>>>,
    bursts: Arc<DashMap<String, BurstEntry<T>>>,
    timers: TimerRegistry,
    next_id: Arc<AtomicU64>,
    counters: Arc<Counters>,
    config: CoordinatorConfig,
}

impl<T> Clone for RequestCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
            bursts: Arc::clone(&self.bursts),
            timers: self.timers.clone(),
            next_id: Arc::clone(&self.next_id),
            counters: Arc::clone(&self.counters),
            config: self.config.clone(),
        }
    }
}

impl<T> Default for RequestCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl<T> RequestCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(config: CoordinatorConfig) -> Self {
        log::debug!(
            "Creating request coordinator (enabled: {}, debounce: {}ms)",
            config.enabled,
            config.debounce_delay_ms
        );
        Self {
            pending: Arc::new(DashMap::new()),
            bursts: Arc::new(DashMap::new()),
            timers: TimerRegistry::default(),
            next_id: Arc::new(AtomicU64::new(0)),
            counters: Arc::new(Counters::default()),
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Execute an operation with deduplication.
    /// If the same key is already in flight, wait for its outcome.
    /// Otherwise, start the operation and share its outcome with every caller
    /// that asks for the key before it settles.
    pub async fn deduplicate<K, F, Fut>(&self, key: K, operation: F) -> T
    where
        K: Into<String>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        if !self.config.enabled {
            self.counters.record_execution();
            return operation().await;
        }

        let outcome = self.join_or_start(key.into(), operation);
        outcome.await
    }

    fn join_or_start<F, Fut>(&self, key: String, operation: F) -> SharedOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        match self.pending.entry(key) {
            Entry::Occupied(mut occupied) => {
                if let Some(outcome) = occupied.get().outcome.upgrade() {
                    log::debug!("Request already pending for key: {:?}", occupied.key());
                    self.counters.record_coalesced();
                    return outcome;
                }

                // Every caller of the previous request went away before it settled
                log::debug!("Restarting abandoned request for key: {:?}", occupied.key());
                let (entry, outcome) = self.start(occupied.key().clone(), operation);
                occupied.insert(entry);
                outcome
            }
            Entry::Vacant(vacant) => {
                log::debug!("Executing new request for key: {:?}", vacant.key());
                let (entry, outcome) = self.start(vacant.key().clone(), operation);
                vacant.insert(entry);
                outcome
            }
        }
    }

    /// Build the shared outcome for a new request. Must not drop a
    /// `PendingRelease` while the caller holds the registry entry.
    fn start<F, Fut>(&self, key: String, operation: F) -> (PendingEntry<T>, SharedOutcome<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = operation();
        let release = PendingRelease {
            registry: Arc::clone(&self.pending),
            key,
            id,
        };

        let outcome = async move {
            let _release = release;
            request.await
        }
        .boxed()
        .shared();
        self.counters.record_execution();

        let entry = PendingEntry {
            id,
            started_at: Utc::now(),
            outcome: outcome
                .downgrade()
                .expect("an unpolled shared future can always be downgraded"),
        };
        (entry, outcome)
    }

    /// Wrap `operation` so that bursts of calls under `key` collapse into the
    /// last one, using the configured default delay.
    pub fn debounce<K, A, U, F, Fut>(&self, key: K, operation: F) -> Debounced<A, U>
    where
        K: Into<String>,
        A: Send + 'static,
        U: Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.debounce_with_delay(key, operation, self.config.debounce_delay())
    }

    /// Wrap `operation` so that bursts of calls under `key` collapse into the
    /// last one. A call runs once `delay` passes without a newer call for the
    /// same key; the calls it replaced never resolve.
    pub fn debounce_with_delay<K, A, U, F, Fut>(
        &self,
        key: K,
        operation: F,
        delay: Duration,
    ) -> Debounced<A, U>
    where
        K: Into<String>,
        A: Send + 'static,
        U: Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let timers = self.config.enabled.then(|| self.timers.clone());
        Debounced::new(
            key.into(),
            delay,
            Arc::new(move |args| operation(args).boxed()),
            timers,
        )
    }

    /// Debounce then deduplicate under the same key, using the configured
    /// default delay.
    pub async fn debounced_request<K, F, Fut>(&self, key: K, operation: F) -> T
    where
        K: Into<String>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.debounced_request_with_delay(key, operation, self.config.debounce_delay())
            .await
    }

    /// Debounce then deduplicate under the same key.
    ///
    /// Every call restarts the delay for `key`. When it elapses the operation
    /// of the last call runs through [`RequestCoordinator::deduplicate`] and
    /// every caller of the burst receives its outcome.
    pub async fn debounced_request_with_delay<K, F, Fut>(
        &self,
        key: K,
        operation: F,
        delay: Duration,
    ) -> T
    where
        K: Into<String>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let key = key.into();
        self.run_debounced(key.clone(), key, operation, delay).await
    }

    /// Debounce under `key`, then deduplicate the request that fires under
    /// `request_key`, using the configured default delay.
    ///
    /// Used when the burst is identified by what the user is doing (typing in
    /// a search box) while the request carries its own parameters. Bursts
    /// whose requests differ are never merged.
    pub async fn debounced_request_as<K, R, F, Fut>(
        &self,
        key: K,
        request_key: R,
        operation: F,
    ) -> T
    where
        K: Into<String>,
        R: Into<String>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.run_debounced(
            key.into(),
            request_key.into(),
            operation,
            self.config.debounce_delay(),
        )
        .await
    }

    async fn run_debounced<F, Fut>(
        &self,
        key: String,
        request_key: String,
        operation: F,
        delay: Duration,
    ) -> T
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        if !self.config.enabled {
            self.counters.record_execution();
            return operation().await;
        }

        let (burst_id, outcome) = self.join_burst(&key);

        let this = self.clone();
        let task_key = key.clone();
        self.timers.schedule(&key, delay, async move {
            let Some((_, burst)) = this.bursts.remove_if(&task_key, |_, b| b.id == burst_id)
            else {
                return;
            };
            let value = this.deduplicate(request_key, operation).await;
            // Every caller of the burst may have gone away
            let _ = burst.settle.send(value);
        });

        match outcome.await {
            Some(value) => value,
            // The burst was cleared before it fired
            None => std::future::pending().await,
        }
    }

    fn join_burst(&self, key: &str) -> (u64, Shared<BoxFuture<'static, Option<T>>>) {
        let burst = self.bursts.entry(key.to_string()).or_insert_with(|| {
            let (settle, receiver) = oneshot::channel();
            BurstEntry {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                settle,
                outcome: receiver.map(Result::ok).boxed().shared(),
            }
        });
        (burst.id, burst.outcome.clone())
    }

    /// Get statistics about pending requests and timers
    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            pending_requests: self.pending.len(),
            pending_timers: self.timers.len(),
            executions: self.counters.executions(),
            coalesced_waiters: self.counters.coalesced_waiters(),
            oldest_pending_since: self
                .pending
                .iter()
                .map(|entry| entry.value().started_at)
                .min(),
        }
    }

    /// Cancel every pending timer and forget every pending request.
    ///
    /// Requests already running keep running for the callers awaiting them,
    /// but later calls start afresh. Debounced calls whose timer is cancelled
    /// never resolve.
    pub fn clear(&self) {
        let timers = self.timers.cancel_all();
        self.bursts.clear();
        let requests = self.pending.len();
        self.pending.clear();
        log::info!(
            "Request coordinator cleared ({} pending requests, {} timers)",
            requests,
            timers
        );
    }

    /// Tear the coordinator down at application shutdown
    pub fn dispose(self) {
        self.clear();
        log::info!("Request coordinator disposed");
    }
}
