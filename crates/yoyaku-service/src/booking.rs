//! Commit-time booking validation.
//!
//! The displayed availability list may be stale by the time a requester
//! confirms; this service guards the moment of commit with a fresh,
//! cache-bypassing read. It is a fast-fail improvement, not the sole
//! correctness mechanism. The store's uniqueness guarantee decides races
//! that slip past the probe.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use yoyaku_core::time::canonical_minute;
use yoyaku_store::StoreError;
use yoyaku_store::model::{Booking, BookingStatus, NewBooking};
use yoyaku_store::store::{BookingStore, with_timeout};

use crate::cache::AppointmentCache;
use crate::error::{ServiceError, ServiceResult};

/// A requester's confirmed pick of one slot.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub provider_id: Uuid,
    pub subject_id: Uuid,
    pub start_at: DateTime<Utc>,
    /// Optional reference to a collaborator-owned record to attach.
    pub link_id: Option<Uuid>,
}

/// Validates and commits booking attempts.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    cache: Arc<AppointmentCache>,
    persistence_timeout: Duration,
}

impl BookingService {
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        cache: Arc<AppointmentCache>,
        persistence_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            persistence_timeout,
        }
    }

    /// ## Summary
    /// Books the requested slot: normalizes the instant, probes the store
    /// directly for a blocking booking at that instant, then inserts a
    /// `Scheduled` booking. The provider's and subject's cache scopes are
    /// invalidated before this returns.
    ///
    /// ## Errors
    /// `SlotTaken` when the slot is occupied or the insert loses the race;
    /// the caller must recompute availability and offer another time.
    /// `ValidationError` for an instant that is already in the past.
    /// Persistence errors pass through untouched.
    #[tracing::instrument(skip(self, request), fields(
        provider_id = %request.provider_id,
        subject_id = %request.subject_id,
        start_at = %request.start_at
    ))]
    pub async fn book(
        &self,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<Booking> {
        let start_at = canonical_minute(request.start_at);
        if start_at < now {
            return Err(ServiceError::ValidationError(
                "booking instant must not be in the past".into(),
            ));
        }

        // Fresh read, never through the cache: the displayed list may be
        // stale.
        let occupied = with_timeout(
            self.persistence_timeout,
            "find_blocking_at",
            self.store.find_blocking_at(request.provider_id, start_at),
        )
        .await?;
        if let Some(holder) = occupied {
            tracing::debug!(holder = %holder.id, "slot already held at commit time");
            return Err(ServiceError::SlotTaken {
                provider_id: request.provider_id,
                start_at,
            });
        }

        let inserted = with_timeout(
            self.persistence_timeout,
            "insert_booking",
            self.store.insert(NewBooking {
                provider_id: request.provider_id,
                subject_id: request.subject_id,
                start_at,
                status: BookingStatus::Scheduled,
                link_id: request.link_id,
            }),
        )
        .await;

        let booking = match inserted {
            Ok(booking) => booking,
            // Two validators raced past the probe; the store admits one.
            Err(StoreError::UniquenessViolation { .. }) => {
                tracing::debug!("insert lost the race for the slot");
                return Err(ServiceError::SlotTaken {
                    provider_id: request.provider_id,
                    start_at,
                });
            }
            Err(other) => return Err(other.into()),
        };

        self.cache.invalidate_scope(request.provider_id);
        self.cache.invalidate_scope(request.subject_id);

        tracing::info!(booking_id = %booking.id, "booking created");
        Ok(booking)
    }
}
