//! Availability computation: calculator + conflict resolver behind one
//! facade.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use yoyaku_store::model::Booking;
use yoyaku_store::store::{BookingStore, ScheduleSource};

use crate::cache::{AppointmentCache, horizon_range};
use crate::error::{ServiceError, ServiceResult};

pub mod calculator;
pub mod resolver;
pub mod slot;

mod resolver_tests;

pub use slot::{Availability, AvailabilityView, DayAvailability, Slot, UnavailableReason};

/// Computes the availability view a caller displays.
///
/// Bookings are read through the cache; staleness here is acceptable
/// because the commit path re-validates against the store directly.
pub struct AvailabilityService {
    bookings: Arc<dyn BookingStore>,
    schedules: Arc<dyn ScheduleSource>,
    cache: Arc<AppointmentCache>,
    persistence_timeout: Duration,
}

impl AvailabilityService {
    #[must_use]
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        schedules: Arc<dyn ScheduleSource>,
        cache: Arc<AppointmentCache>,
        persistence_timeout: Duration,
    ) -> Self {
        Self {
            bookings,
            schedules,
            cache,
            persistence_timeout,
        }
    }

    /// ## Summary
    /// The provider's availability for `horizon_days` days starting on
    /// `now`'s date: schedule snapshot → candidate slots → conflict
    /// resolution against the currently blocking bookings.
    ///
    /// ## Errors
    /// `ScheduleNotFound` if the provider has no schedule; `ValidationError`
    /// for a malformed schedule; persistence errors from the underlying
    /// reads.
    #[tracing::instrument(skip(self), fields(%provider_id, horizon_days))]
    pub async fn availability_for(
        &self,
        provider_id: Uuid,
        horizon_days: u32,
        now: DateTime<Utc>,
    ) -> ServiceResult<AvailabilityView> {
        let schedule = self
            .cache
            .schedule(self.schedules.as_ref(), provider_id, self.persistence_timeout)
            .await?
            .ok_or(ServiceError::ScheduleNotFound(provider_id))?;

        let candidates = calculator::candidate_slots(&schedule, horizon_days, now)?;

        let bookings: Vec<Booking> = self
            .cache
            .bookings_for_provider(
                self.bookings.as_ref(),
                provider_id,
                horizon_range(now, horizon_days),
                self.persistence_timeout,
            )
            .await?;

        Ok(resolver::resolve(&schedule, candidates, &bookings, now))
    }
}
