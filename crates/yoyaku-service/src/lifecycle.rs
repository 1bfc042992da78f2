//! Booking status lifecycle.
//!
//! `Scheduled` is the initial state; `Checked` and `Cancelled` are
//! terminal. A transition updates the booking, appends its audit entry as
//! the same atomic store operation, then notifies live-update subscribers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use yoyaku_store::StoreError;
use yoyaku_store::model::{Booking, BookingStatus, NewHistoryEntry, StatusUpdate};
use yoyaku_store::store::{BookingStore, with_timeout};

use crate::cache::AppointmentCache;
use crate::error::{ServiceError, ServiceResult};
use crate::live::{LiveUpdate, LiveUpdates};

/// A requested transition with its status-specific payload.
#[derive(Debug, Clone)]
pub enum TransitionRequest {
    /// Scheduled → Checked, with completion notes.
    Check { notes: String },
    /// Scheduled → Cancelled, with the cancellation reason.
    Cancel { reason: String },
}

impl TransitionRequest {
    #[must_use]
    pub const fn target(&self) -> BookingStatus {
        match self {
            Self::Check { .. } => BookingStatus::Checked,
            Self::Cancel { .. } => BookingStatus::Cancelled,
        }
    }
}

/// Statuses a booking may move to from `from`. Everything not listed is
/// rejected; terminal states list nothing.
#[must_use]
pub const fn allowed_transitions(from: BookingStatus) -> &'static [BookingStatus] {
    match from {
        BookingStatus::Scheduled => &[BookingStatus::Checked, BookingStatus::Cancelled],
        BookingStatus::InProgress | BookingStatus::Checked | BookingStatus::Cancelled => &[],
    }
}

/// Enforces the status state machine and writes the audit trail.
pub struct LifecycleService {
    store: Arc<dyn BookingStore>,
    cache: Arc<AppointmentCache>,
    updates: LiveUpdates,
    persistence_timeout: Duration,
}

impl LifecycleService {
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        cache: Arc<AppointmentCache>,
        updates: LiveUpdates,
        persistence_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            updates,
            persistence_timeout,
        }
    }

    /// Handle for subscribing to the transitions this service publishes.
    #[must_use]
    pub const fn updates(&self) -> &LiveUpdates {
        &self.updates
    }

    /// ## Summary
    /// Applies one status transition: validates it against the state
    /// machine, writes status fields and audit entry atomically, publishes
    /// the change, and invalidates the affected cache scopes before
    /// returning.
    ///
    /// ## Errors
    /// `NotFound` for an unknown booking id; `InvalidTransition` when the
    /// state machine forbids the move (including one raced by a concurrent
    /// transition); `TransitionFailed` when the underlying write fails, in
    /// which case no partial state remains.
    #[tracing::instrument(skip(self, request), fields(
        %booking_id,
        target = %request.target()
    ))]
    pub async fn transition(
        &self,
        booking_id: Uuid,
        request: TransitionRequest,
        actor_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> ServiceResult<Booking> {
        let booking = with_timeout(
            self.persistence_timeout,
            "find_booking",
            self.store.find_by_id(booking_id),
        )
        .await?
        .ok_or(ServiceError::NotFound(booking_id))?;

        let target = request.target();
        if !allowed_transitions(booking.status).contains(&target) {
            tracing::warn!(from = %booking.status, to = %target, "transition rejected");
            return Err(ServiceError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }

        let (cancellation_reason, completion_notes, detail) = match request {
            TransitionRequest::Check { notes } => (None, Some(notes.clone()), Some(notes)),
            TransitionRequest::Cancel { reason } => (Some(reason.clone()), None, Some(reason)),
        };

        let update = StatusUpdate {
            status: target,
            changed_at: now,
            changed_by: actor_id,
            cancellation_reason,
            completion_notes,
        };
        let entry = NewHistoryEntry {
            booking_id,
            old_status: booking.status,
            new_status: target,
            actor_id,
            changed_at: now,
            detail,
        };

        let applied = with_timeout(
            self.persistence_timeout,
            "apply_transition",
            self.store.apply_transition(booking_id, update, entry),
        )
        .await;
        let updated = match applied {
            Ok(updated) => updated,
            Err(StoreError::NotFound(id)) => return Err(ServiceError::NotFound(id)),
            // A concurrent transition won; report against the status it
            // left behind.
            Err(StoreError::StaleStatus { actual, .. }) => {
                return Err(ServiceError::InvalidTransition {
                    from: actual,
                    to: target,
                });
            }
            Err(other) => return Err(ServiceError::TransitionFailed(other)),
        };

        self.cache.invalidate_scope(updated.provider_id);
        self.cache.invalidate_scope(updated.subject_id);
        self.cache.invalidate_scope(booking_id);

        self.updates.publish(LiveUpdate {
            booking_id,
            status: target,
        });

        tracing::info!(from = %booking.status, to = %target, "booking status changed");
        Ok(updated)
    }
}
