//! Background sweep of expired cache entries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sheetproxy_core::constants::MIN_SWEEP_INTERVAL_SECONDS;

use crate::cache::ProxyCache;

/// Handle to a running sweep task.
///
/// Handles compare equal when they refer to the same task.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    id: u64,
    token: CancellationToken,
}

impl SchedulerHandle {
    /// Identifier of the sweep task, unique per scheduler.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns true once the task has been told to stop.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl PartialEq for SchedulerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SchedulerHandle {}

/// Periodically removes expired entries from a [`ProxyCache`].
///
/// Starts `Stopped`. [`start`](Self::start) spawns one tokio task that sweeps
/// every interval; starting again while running returns the same handle.
/// [`stop`](Self::stop) cancels the task and is a no-op when stopped.
/// Dropping the scheduler stops it.
pub struct ExpiryScheduler<V> {
    cache: Arc<ProxyCache<V>>,
    interval: Duration,
    active: Mutex<Option<SchedulerHandle>>,
    next_id: AtomicU64,
    sweeps: Arc<AtomicU64>,
}

impl<V> ExpiryScheduler<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a stopped scheduler that sweeps at the cache's configured interval.
    pub fn new(cache: Arc<ProxyCache<V>>) -> Self {
        let interval = cache.config().sweep_interval();
        Self::with_interval(cache, interval)
    }

    /// Creates a stopped scheduler with an explicit sweep interval.
    ///
    /// Intervals shorter than one second are raised to one second.
    pub fn with_interval(cache: Arc<ProxyCache<V>>, interval: Duration) -> Self {
        Self {
            cache,
            interval: interval.max(Duration::from_secs(MIN_SWEEP_INTERVAL_SECONDS)),
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
            sweeps: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts sweeping, or returns the handle of the sweep already running.
    ///
    /// The first sweep happens one interval after start.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> SchedulerHandle {
        let mut active = self.active.lock();
        if let Some(handle) = active.as_ref() {
            debug!(id = handle.id, "Expiry scheduler already running");
            return handle.clone();
        }

        let handle = SchedulerHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        };

        let token = handle.token.clone();
        let cache = Arc::clone(&self.cache);
        let sweeps = Arc::clone(&self.sweeps);
        let period = self.interval;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        sweeps.fetch_add(1, Ordering::Relaxed);
                        debug!(
                            removed,
                            remaining = cache.count_cached_entries(),
                            "Swept expired cache entries"
                        );
                    }
                }
            }
        });

        info!(id = handle.id, interval_secs = period.as_secs(), "Expiry scheduler started");
        *active = Some(handle.clone());
        handle
    }

    /// Stops sweeping. Does nothing if not running.
    pub fn stop(&self) {
        if let Some(handle) = self.active.lock().take() {
            handle.token.cancel();
            info!(id = handle.id, "Expiry scheduler stopped");
        }
    }

    /// Returns true while a sweep task is active.
    pub fn is_running(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Number of sweeps completed since the scheduler was created.
    pub fn sweep_count(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Period between sweeps.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<V> Drop for ExpiryScheduler<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.active.get_mut().take() {
            handle.token.cancel();
        }
    }
}
