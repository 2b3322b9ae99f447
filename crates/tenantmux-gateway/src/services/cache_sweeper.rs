//! Periodic cache cleanup
//!
//! Runs `sweep` on every registered cache once per period on its own task.
//! The first sweep happens one full period after `start`.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tenantmux_core::Sweep;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Owns the sweep timer for a set of caches
pub struct CacheSweeper {
    period: Duration,
    caches: Vec<Arc<dyn Sweep>>,
    running: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl CacheSweeper {
    pub fn new(period: Duration, caches: Vec<Arc<dyn Sweep>>) -> Self {
        Self {
            period,
            caches,
            running: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sweep every cache once. Returns the total number of removed entries.
    pub fn sweep_once(&self, now: Instant) -> usize {
        let mut removed = 0;
        for cache in &self.caches {
            let count = cache.sweep_expired(now);
            if count > 0 {
                debug!(
                    "[CacheSweeper] {}: removed {}, {} remaining",
                    cache.cache_name(),
                    count,
                    cache.entry_count()
                );
            }
            removed += count;
        }
        info!(removed, caches = self.caches.len(), "Cache cleanup performed");
        removed
    }

    /// Start the periodic sweep. No-op if already running.
    pub fn start(self: &Arc<Self>) {
        let mut running = self.running.lock();
        if running.is_some() {
            warn!("[CacheSweeper] Already running");
            return;
        }

        let token = CancellationToken::new();
        let sweeper = Arc::clone(self);
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + sweeper.period, sweeper.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    tick = ticker.tick() => {
                        sweeper.sweep_once(tick);
                    }
                }
            }
            debug!("[CacheSweeper] Stopped");
        });

        info!("[CacheSweeper] Started (every {:?})", self.period);
        *running = Some((token, handle));
    }

    /// Stop the periodic sweep and wait for the task to exit
    pub async fn stop(&self) {
        let running = self.running.lock().take();
        if let Some((token, handle)) = running {
            token.cancel();
            if let Err(e) = handle.await {
                warn!("[CacheSweeper] Sweep task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }
}
