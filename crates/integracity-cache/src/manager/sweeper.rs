//! Periodic expiry sweep

use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::{ApiCache, Inner};

/// Sweep every `period` until the cache is dropped or the task is aborted
///
/// The first sweep happens one full period after spawning.
pub(super) fn spawn(runtime: &Handle, cache: Weak<Inner>, period: Duration) -> JoinHandle<()> {
    runtime.spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(inner) = cache.upgrade() else {
                break;
            };
            ApiCache::from_inner(inner).purge_expired();
        }
    })
}
