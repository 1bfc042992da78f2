//! Optional fixed-interval availability refresh.
//!
//! Owned by the presentation layer, never by the engine. Staleness of the
//! published view is bounded by the interval plus one recomputation; the
//! refresh has no bearing on correctness, which rests on commit-time
//! validation and the store's uniqueness guarantee. Prefer reacting to the
//! live-update channel where possible and keep this as a coarse fallback.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::availability::{AvailabilityService, AvailabilityView};

/// Owns the background task; aborts it when dropped.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// ## Summary
/// Spawns a task that recomputes a provider's availability every
/// `interval` (first tick immediately) and publishes the view on a watch
/// channel. Failed recomputations are logged and the previous view stays
/// current; the task ends when the last receiver is dropped.
#[must_use]
pub fn spawn(
    availability: Arc<AvailabilityService>,
    provider_id: Uuid,
    horizon_days: u32,
    interval: Duration,
) -> (RefreshHandle, watch::Receiver<AvailabilityView>) {
    let (sender, receiver) = watch::channel(AvailabilityView::default());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match availability
                .availability_for(provider_id, horizon_days, Utc::now())
                .await
            {
                Ok(view) => {
                    if sender.send(view).is_err() {
                        tracing::debug!(%provider_id, "refresh receiver dropped, stopping");
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!(%provider_id, %error, "availability refresh failed");
                }
            }
        }
    });

    (RefreshHandle { task }, receiver)
}
