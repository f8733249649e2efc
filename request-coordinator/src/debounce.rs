use dashmap::{mapref::entry::Entry, DashMap};
use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

/// A scheduled call waiting for its delay to elapse
struct TimerEntry {
    id: u64,
    handle: AbortHandle,
}

/// Map of keys to the single timer scheduled for each of them.
///
/// A timer only runs its task if it is still the registered timer for its key
/// once the delay elapses. Firing, replacement and cancellation all remove the
/// entry, so the map only holds timers that have yet to fire.
#[derive(Clone, Default)]
pub(crate) struct TimerRegistry {
    timers: Arc<DashMap<String, TimerEntry>>,
    next_id: Arc<AtomicU64>,
}

impl TimerRegistry {
    /// Schedule `task` to run after `delay` under `key`, cancelling the timer
    /// previously scheduled for that key.
    pub(crate) fn schedule<Fut>(&self, key: &str, delay: Duration, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let task_key = key.to_string();

        // Holding the entry keeps the new timer from claiming its slot before it is inserted.
        let entry = self.timers.entry(key.to_string());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if timers
                .remove_if(&task_key, |_, timer| timer.id == id)
                .is_none()
            {
                log::trace!("Timer superseded after firing for key: {:?}", task_key);
                return;
            }

            log::debug!("Debounced call firing for key: {:?}", task_key);
            task.await;
        })
        .abort_handle();

        match entry {
            Entry::Occupied(mut occupied) => {
                log::debug!("Replacing pending timer for key: {:?}", key);
                let previous = occupied.insert(TimerEntry { id, handle });
                previous.handle.abort();
            }
            Entry::Vacant(vacant) => {
                vacant.insert(TimerEntry { id, handle });
            }
        }
    }

    /// Cancel every pending timer, returning how many were cancelled
    pub(crate) fn cancel_all(&self) -> usize {
        let mut cancelled = 0;
        self.timers.retain(|_, timer| {
            timer.handle.abort();
            cancelled += 1;
            false
        });
        cancelled
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }
}

type DebouncedFn<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, T> + Send + Sync>;

/// An operation wrapped so that bursts of calls collapse into the last one.
///
/// Every [`Debounced::call`] cancels the call still waiting under the same key
/// and schedules itself after the delay. Only the last call of a burst runs;
/// the calls it replaced never resolve.
pub struct Debounced<A, T> {
    key: String,
    delay: Duration,
    operation: DebouncedFn<A, T>,
    // None when the coordinator is disabled and calls run right away
    timers: Option<TimerRegistry>,
}

impl<A, T> Clone for Debounced<A, T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            delay: self.delay,
            operation: Arc::clone(&self.operation),
            timers: self.timers.clone(),
        }
    }
}

impl<A, T> Debounced<A, T>
where
    A: Send + 'static,
    T: Send + 'static,
{
    pub(crate) fn new(
        key: String,
        delay: Duration,
        operation: DebouncedFn<A, T>,
        timers: Option<TimerRegistry>,
    ) -> Self {
        Self {
            key,
            delay,
            operation,
            timers,
        }
    }

    /// Schedule a call with `args`.
    ///
    /// The call is scheduled immediately, whether or not the returned future
    /// is ever polled. The future resolves with the operation's output once
    /// this call runs, and stays pending forever if a newer call replaces it.
    pub fn call(&self, args: A) -> DebouncedCall<T> {
        let (sender, receiver) = oneshot::channel();
        let operation = Arc::clone(&self.operation);
        let task = async move {
            let value = operation(args).await;
            // The caller may have stopped waiting
            let _ = sender.send(value);
        };

        match &self.timers {
            Some(timers) => timers.schedule(&self.key, self.delay, task),
            None => {
                tokio::spawn(task);
            }
        }

        DebouncedCall {
            receiver,
            superseded: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Output of a single [`Debounced::call`]
#[must_use = "a debounced call still runs when dropped, but its output is lost"]
pub struct DebouncedCall<T> {
    receiver: oneshot::Receiver<T>,
    superseded: bool,
}

impl<T> Future for DebouncedCall<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if self.superseded {
            return Poll::Pending;
        }

        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(value),
            Poll::Ready(Err(_)) => {
                self.superseded = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
