//! Live-update push channel.
//!
//! `StatusLifecycleManager` publishes one event per successful transition;
//! the presentation layer subscribes and reacts (e.g. by refreshing its
//! availability view instead of polling).

use tokio::sync::broadcast;
use uuid::Uuid;

use yoyaku_core::constants::LIVE_UPDATE_CHANNEL_CAPACITY;
use yoyaku_store::model::BookingStatus;

/// One published status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveUpdate {
    pub booking_id: Uuid,
    pub status: BookingStatus,
}

/// Broadcast handle shared by publisher and subscribers.
#[derive(Debug, Clone)]
pub struct LiveUpdates {
    sender: broadcast::Sender<LiveUpdate>,
}

impl LiveUpdates {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveUpdate> {
        self.sender.subscribe()
    }

    /// Publishes a status change. A transition never fails because nobody
    /// is listening; lagging receivers drop old events, not the write.
    pub fn publish(&self, update: LiveUpdate) {
        if self.sender.send(update).is_err() {
            tracing::trace!(booking_id = %update.booking_id, "no live-update subscribers");
        }
    }
}

impl Default for LiveUpdates {
    fn default() -> Self {
        Self::new(LIVE_UPDATE_CHANNEL_CAPACITY)
    }
}
