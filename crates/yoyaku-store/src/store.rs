//! Persistence collaborator interfaces.
//!
//! The engine talks to its bookings store and schedule source only through
//! these traits; no backend type leaks past them. Implementations must be
//! safe to share across concurrently dispatched requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{
    Booking, DateRange, NewBooking, NewHistoryEntry, ScheduleConfig, StatusHistoryEntry,
    StatusUpdate,
};

/// Bookings store abstraction.
///
/// The store owns the hard uniqueness guarantee: `insert` must reject a
/// second blocking booking at the same (provider, canonical instant) with
/// `StoreError::UniquenessViolation`, even when two writers race past the
/// commit-time validation simultaneously.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// ## Summary
    /// Inserts a new booking.
    ///
    /// ## Errors
    /// `UniquenessViolation` if the booking is blocking and its slot is
    /// already held by another blocking booking; backend errors otherwise.
    async fn insert(&self, booking: NewBooking) -> StoreResult<Booking>;

    /// ## Summary
    /// Applies a status update and appends its audit entry as one atomic
    /// unit. Either both are visible afterwards or neither is.
    ///
    /// ## Errors
    /// `NotFound` for an unknown booking id; backend errors otherwise, in
    /// which case no partial state may remain.
    async fn apply_transition(
        &self,
        booking_id: Uuid,
        update: StatusUpdate,
        entry: NewHistoryEntry,
    ) -> StoreResult<Booking>;

    /// ## Errors
    /// Backend errors only; an unknown id is `Ok(None)`.
    async fn find_by_id(&self, booking_id: Uuid) -> StoreResult<Option<Booking>>;

    /// ## Summary
    /// Fresh read of the blocking booking occupying (provider, instant),
    /// if any. This is the commit-time conflict probe; it must always hit
    /// the backend directly, never a cache.
    ///
    /// ## Errors
    /// Backend errors only.
    async fn find_blocking_at(
        &self,
        provider_id: Uuid,
        start_at: DateTime<Utc>,
    ) -> StoreResult<Option<Booking>>;

    /// ## Summary
    /// All bookings for a provider whose slot date falls inside `range`,
    /// ordered by instant.
    ///
    /// ## Errors
    /// Backend errors only.
    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Booking>>;

    /// ## Summary
    /// All bookings for a subject, ordered by instant.
    ///
    /// ## Errors
    /// Backend errors only.
    async fn find_by_subject(&self, subject_id: Uuid) -> StoreResult<Vec<Booking>>;

    /// ## Summary
    /// Appends one audit entry outside of a status transition (e.g. an
    /// imported trail). The trail is append-only; there is no update or
    /// delete counterpart.
    ///
    /// ## Errors
    /// Backend errors only.
    async fn append_history(&self, entry: NewHistoryEntry) -> StoreResult<StatusHistoryEntry>;

    /// ## Summary
    /// The audit trail of a booking in append order.
    ///
    /// ## Errors
    /// Backend errors only.
    async fn history_for(&self, booking_id: Uuid) -> StoreResult<Vec<StatusHistoryEntry>>;
}

/// Schedule configuration collaborator.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// ## Summary
    /// The provider's schedule, fetched once per availability computation
    /// and treated as an immutable snapshot.
    ///
    /// ## Errors
    /// Backend errors only; an unknown provider is `Ok(None)`.
    async fn schedule_for(&self, provider_id: Uuid) -> StoreResult<Option<ScheduleConfig>>;
}

/// ## Summary
/// Bounds a persistence call with a timeout, surfacing expiry as
/// `StoreError::Timeout` tagged with the operation name.
///
/// ## Errors
/// The inner call's error, or `Timeout` once `limit` elapses.
pub async fn with_timeout<T, F>(limit: Duration, op: &'static str, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>> + Send,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(op, limit_ms = limit.as_millis() as u64, "persistence call timed out");
            Err(StoreError::Timeout(op))
        }
    }
}
