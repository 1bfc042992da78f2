//! In-memory store.
//!
//! Backs the engine in tests and in embedders that bring no external
//! database. One mutex guards all tables, which makes `insert` and
//! `apply_transition` atomic exactly the way the trait contract demands.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use yoyaku_core::time::canonical_minute;

use crate::error::{StoreError, StoreResult};
use crate::model::{
    Booking, DateRange, NewBooking, NewHistoryEntry, ScheduleConfig, StatusHistoryEntry,
    StatusUpdate,
};
use crate::store::{BookingStore, ScheduleSource};

#[derive(Debug, Default)]
struct Tables {
    bookings: HashMap<Uuid, Booking>,
    /// Uniqueness index over blocking bookings: (provider, canonical
    /// instant) → booking id. Entries leave the index when their booking
    /// reaches a terminal status.
    occupied: HashMap<(Uuid, DateTime<Utc>), Uuid>,
    history: Vec<StatusHistoryEntry>,
    schedules: HashMap<Uuid, ScheduleConfig>,
}

/// In-memory implementation of [`BookingStore`] and [`ScheduleSource`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a provider's schedule snapshot.
    pub fn put_schedule(&self, schedule: ScheduleConfig) {
        self.locked().schedules.insert(schedule.provider_id, schedule);
    }

    fn locked(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means another writer panicked mid-test; the
        // tables themselves are always left consistent.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, booking: NewBooking) -> StoreResult<Booking> {
        let start_at = canonical_minute(booking.start_at);
        let now = Utc::now();
        let mut tables = self.locked();

        if booking.status.is_blocking() {
            if let Some(holder) = tables.occupied.get(&(booking.provider_id, start_at)) {
                tracing::debug!(provider_id = %booking.provider_id, %start_at, holder = %holder,
                    "insert rejected: slot occupied");
                return Err(StoreError::UniquenessViolation {
                    provider_id: booking.provider_id,
                    start_at,
                });
            }
        }

        let id = Uuid::new_v4();
        let stored = Booking {
            id,
            provider_id: booking.provider_id,
            subject_id: booking.subject_id,
            start_at,
            status: booking.status,
            status_changed_at: now,
            status_changed_by: None,
            cancellation_reason: None,
            completion_notes: None,
            link_id: booking.link_id,
            created_at: now,
            updated_at: now,
        };
        if stored.status.is_blocking() {
            tables.occupied.insert((stored.provider_id, start_at), id);
        }
        tables.bookings.insert(id, stored.clone());
        Ok(stored)
    }

    async fn apply_transition(
        &self,
        booking_id: Uuid,
        update: StatusUpdate,
        entry: NewHistoryEntry,
    ) -> StoreResult<Booking> {
        let mut tables = self.locked();

        let Some(current) = tables.bookings.get(&booking_id).cloned() else {
            return Err(StoreError::NotFound(booking_id));
        };

        if current.status != entry.old_status {
            return Err(StoreError::StaleStatus {
                booking_id,
                expected: entry.old_status,
                actual: current.status,
            });
        }

        let mut updated = current.clone();
        updated.status = update.status;
        updated.status_changed_at = update.changed_at;
        updated.status_changed_by = update.changed_by;
        updated.updated_at = update.changed_at;
        if let Some(reason) = update.cancellation_reason {
            updated.cancellation_reason = Some(reason);
        }
        if let Some(notes) = update.completion_notes {
            updated.completion_notes = Some(notes);
        }

        if current.status.is_blocking() && !updated.status.is_blocking() {
            tables
                .occupied
                .remove(&(updated.provider_id, updated.start_at));
        }

        let row = StatusHistoryEntry {
            id: Uuid::new_v4(),
            booking_id: entry.booking_id,
            old_status: entry.old_status,
            new_status: entry.new_status,
            actor_id: entry.actor_id,
            changed_at: entry.changed_at,
            detail: entry.detail,
        };
        tables.history.push(row);
        tables.bookings.insert(booking_id, updated.clone());

        Ok(updated)
    }

    async fn find_by_id(&self, booking_id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.locked().bookings.get(&booking_id).cloned())
    }

    async fn find_blocking_at(
        &self,
        provider_id: Uuid,
        start_at: DateTime<Utc>,
    ) -> StoreResult<Option<Booking>> {
        let start_at = canonical_minute(start_at);
        let tables = self.locked();
        let found = tables
            .occupied
            .get(&(provider_id, start_at))
            .and_then(|id| tables.bookings.get(id))
            .filter(|booking| booking.status.is_blocking())
            .cloned();
        Ok(found)
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Booking>> {
        let tables = self.locked();
        let mut found: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| {
                booking.provider_id == provider_id
                    && range.contains(booking.start_at.date_naive())
            })
            .cloned()
            .collect();
        found.sort_by_key(|booking| booking.start_at);
        Ok(found)
    }

    async fn find_by_subject(&self, subject_id: Uuid) -> StoreResult<Vec<Booking>> {
        let tables = self.locked();
        let mut found: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| booking.subject_id == subject_id)
            .cloned()
            .collect();
        found.sort_by_key(|booking| booking.start_at);
        Ok(found)
    }

    async fn append_history(&self, entry: NewHistoryEntry) -> StoreResult<StatusHistoryEntry> {
        let row = StatusHistoryEntry {
            id: Uuid::new_v4(),
            booking_id: entry.booking_id,
            old_status: entry.old_status,
            new_status: entry.new_status,
            actor_id: entry.actor_id,
            changed_at: entry.changed_at,
            detail: entry.detail,
        };
        self.locked().history.push(row.clone());
        Ok(row)
    }

    async fn history_for(&self, booking_id: Uuid) -> StoreResult<Vec<StatusHistoryEntry>> {
        Ok(self
            .locked()
            .history
            .iter()
            .filter(|entry| entry.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScheduleSource for MemoryStore {
    async fn schedule_for(&self, provider_id: Uuid) -> StoreResult<Option<ScheduleConfig>> {
        Ok(self.locked().schedules.get(&provider_id).cloned())
    }
}
