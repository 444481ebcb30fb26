//! Fixed-interval refresh where a tick never starts a cycle while the
//! previous one is still running.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of a cycle; releases the guard on drop.
#[derive(Debug)]
pub struct InFlightPermit {
    busy: Arc<AtomicBool>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard, or `None` when a cycle is already running.
    pub fn try_begin(&self) -> Option<InFlightPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Runs `cycle` every `period`, skipping ticks that land while a cycle is in
/// flight. Stops after `max_cycles` started cycles, if given, and waits for
/// them to finish. Returns the number of cycles started.
pub async fn run_periodic<F, Fut>(period: Duration, max_cycles: Option<usize>, mut cycle: F) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let guard = InFlightGuard::new();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut tasks = JoinSet::new();
    let mut started = 0;

    while max_cycles.is_none_or(|max| started < max) {
        ticker.tick().await;
        while let Some(finished) = tasks.try_join_next() {
            if let Err(e) = finished {
                warn!(error = %e, "Refresh cycle task failed");
            }
        }

        let Some(permit) = guard.try_begin() else {
            debug!("Previous refresh cycle still running, skipping tick");
            continue;
        };

        started += 1;
        debug!("Starting refresh cycle {}", started);
        let run = cycle();
        tasks.spawn(async move {
            run.await;
            drop(permit);
        });
    }

    while let Some(finished) = tasks.join_next().await {
        if let Err(e) = finished {
            warn!(error = %e, "Refresh cycle task failed");
        }
    }
    started
}
