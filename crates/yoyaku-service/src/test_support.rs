//! Shared fixtures for in-crate tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use yoyaku_store::error::StoreResult;
use yoyaku_store::memory::MemoryStore;
use yoyaku_store::model::{
    Booking, DaySchedule, DateRange, NewBooking, NewHistoryEntry, ScheduleConfig,
    StatusHistoryEntry, StatusUpdate,
};
use yoyaku_store::store::{BookingStore, ScheduleSource};

/// 2025-06-01, a Sunday: the reference "now" used by most fixtures so the
/// whole following week lies in the future.
pub(crate) fn sunday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// An instant on Monday 2025-06-02.
pub(crate) fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
}

pub(crate) fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

/// Mon-Fri 09:00-17:00, no breaks, valid through 2025.
pub(crate) fn weekday_schedule(provider_id: Uuid, slot_duration_minutes: u32) -> ScheduleConfig {
    let working = DaySchedule::working(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    );
    ScheduleConfig {
        provider_id,
        slot_duration_minutes,
        valid_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        valid_until: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        week: [
            working.clone(),
            working.clone(),
            working.clone(),
            working.clone(),
            working,
            DaySchedule::off(),
            DaySchedule::off(),
        ],
        vacations: vec![],
    }
}

/// Memory store that counts reads, for asserting cache hits and misses.
#[derive(Debug, Default)]
pub(crate) struct CountingStore {
    pub inner: MemoryStore,
    pub provider_reads: AtomicUsize,
    pub subject_reads: AtomicUsize,
    pub schedule_reads: AtomicUsize,
    pub blocking_probes: AtomicUsize,
}

impl CountingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn provider_reads(&self) -> usize {
        self.provider_reads.load(Ordering::SeqCst)
    }

    pub(crate) fn subject_reads(&self) -> usize {
        self.subject_reads.load(Ordering::SeqCst)
    }

    pub(crate) fn schedule_reads(&self) -> usize {
        self.schedule_reads.load(Ordering::SeqCst)
    }

    pub(crate) fn blocking_probes(&self) -> usize {
        self.blocking_probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingStore for CountingStore {
    async fn insert(&self, booking: NewBooking) -> StoreResult<Booking> {
        self.inner.insert(booking).await
    }

    async fn apply_transition(
        &self,
        booking_id: Uuid,
        update: StatusUpdate,
        entry: NewHistoryEntry,
    ) -> StoreResult<Booking> {
        self.inner.apply_transition(booking_id, update, entry).await
    }

    async fn find_by_id(&self, booking_id: Uuid) -> StoreResult<Option<Booking>> {
        self.inner.find_by_id(booking_id).await
    }

    async fn find_blocking_at(
        &self,
        provider_id: Uuid,
        start_at: DateTime<Utc>,
    ) -> StoreResult<Option<Booking>> {
        self.blocking_probes.fetch_add(1, Ordering::SeqCst);
        self.inner.find_blocking_at(provider_id, start_at).await
    }

    async fn find_by_provider(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Booking>> {
        self.provider_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_provider(provider_id, range).await
    }

    async fn find_by_subject(&self, subject_id: Uuid) -> StoreResult<Vec<Booking>> {
        self.subject_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_subject(subject_id).await
    }

    async fn append_history(&self, entry: NewHistoryEntry) -> StoreResult<StatusHistoryEntry> {
        self.inner.append_history(entry).await
    }

    async fn history_for(&self, booking_id: Uuid) -> StoreResult<Vec<StatusHistoryEntry>> {
        self.inner.history_for(booking_id).await
    }
}

#[async_trait]
impl ScheduleSource for CountingStore {
    async fn schedule_for(&self, provider_id: Uuid) -> StoreResult<Option<ScheduleConfig>> {
        self.schedule_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.schedule_for(provider_id).await
    }
}
