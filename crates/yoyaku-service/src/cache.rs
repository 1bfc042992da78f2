//! TTL read-through cache over the queries the engine repeats.
//!
//! The cache is an explicitly constructed, owned instance injected into the
//! services that use it; there is no global. It trades staleness (bounded by
//! the ttl and by write-triggered invalidation) for cheap repeated reads.
//! It has no bearing on correctness: the commit-time validation never reads
//! through it, and any cache failure degrades to a direct read.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use yoyaku_core::constants::CACHE_EVICTION_DIVISOR;
use yoyaku_store::error::StoreResult;
use yoyaku_store::model::{Booking, DateRange, ScheduleConfig};
use yoyaku_store::store::{BookingStore, ScheduleSource, with_timeout};

use crate::error::ServiceResult;

/// Which underlying query an entry answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    ProviderBookings,
    SubjectBookings,
    Schedule,
}

/// Cache key: query kind + scope id + optional date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: QueryKind,
    pub scope: Uuid,
    pub range: Option<DateRange>,
}

#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Bookings(Vec<Booking>),
    Schedule(Box<ScheduleConfig>),
}

#[derive(Debug)]
struct Entry {
    payload: Payload,
    inserted_at: Instant,
    ttl: Duration,
}

impl Entry {
    /// An entry is logically absent once its age reaches the ttl.
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= self.ttl
    }
}

/// Non-fatal cache trouble; always degrades to a direct read.
#[derive(Error, Debug)]
pub(crate) enum CacheError {
    #[error("cache lock poisoned")]
    Poisoned,
}

/// TTL read-through cache for availability and status queries.
pub struct AppointmentCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
    ttl: Duration,
    capacity: usize,
}

impl AppointmentCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// ## Summary
    /// Bookings for a provider inside a date range, served from a live
    /// entry when one exists, otherwise read through to the store.
    ///
    /// ## Errors
    /// Errors from the underlying query only; cache trouble is logged and
    /// degrades to the direct read.
    pub async fn bookings_for_provider(
        &self,
        store: &dyn BookingStore,
        provider_id: Uuid,
        range: DateRange,
        timeout: Duration,
    ) -> ServiceResult<Vec<Booking>> {
        let key = CacheKey {
            kind: QueryKind::ProviderBookings,
            scope: provider_id,
            range: Some(range),
        };
        if let Some(Payload::Bookings(cached)) = self.live(&key) {
            tracing::trace!(%provider_id, "provider bookings served from cache");
            return Ok(cached);
        }

        let fresh = with_timeout(
            timeout,
            "bookings_by_provider",
            store.find_by_provider(provider_id, range),
        )
        .await?;
        self.remember(key, Payload::Bookings(fresh.clone()));
        Ok(fresh)
    }

    /// ## Summary
    /// Bookings for a subject, read-through.
    ///
    /// ## Errors
    /// Errors from the underlying query only.
    pub async fn bookings_for_subject(
        &self,
        store: &dyn BookingStore,
        subject_id: Uuid,
        timeout: Duration,
    ) -> ServiceResult<Vec<Booking>> {
        let key = CacheKey {
            kind: QueryKind::SubjectBookings,
            scope: subject_id,
            range: None,
        };
        if let Some(Payload::Bookings(cached)) = self.live(&key) {
            tracing::trace!(%subject_id, "subject bookings served from cache");
            return Ok(cached);
        }

        let fresh = with_timeout(
            timeout,
            "bookings_by_subject",
            store.find_by_subject(subject_id),
        )
        .await?;
        self.remember(key, Payload::Bookings(fresh.clone()));
        Ok(fresh)
    }

    /// ## Summary
    /// A provider's schedule snapshot, read-through. A missing schedule is
    /// not cached.
    ///
    /// ## Errors
    /// Errors from the underlying query only.
    pub async fn schedule(
        &self,
        source: &dyn ScheduleSource,
        provider_id: Uuid,
        timeout: Duration,
    ) -> ServiceResult<Option<ScheduleConfig>> {
        let key = CacheKey {
            kind: QueryKind::Schedule,
            scope: provider_id,
            range: None,
        };
        if let Some(Payload::Schedule(cached)) = self.live(&key) {
            tracing::trace!(%provider_id, "schedule served from cache");
            return Ok(Some(*cached));
        }

        let fresh: StoreResult<Option<ScheduleConfig>> =
            with_timeout(timeout, "schedule_for", source.schedule_for(provider_id)).await;
        let fresh = fresh?;
        if let Some(schedule) = &fresh {
            self.remember(key, Payload::Schedule(Box::new(schedule.clone())));
        }
        Ok(fresh)
    }

    /// ## Summary
    /// Drops every entry whose scope id matches. Writers call this
    /// synchronously, before the write returns, for each id the write
    /// affects (provider, subject, booking).
    pub fn invalidate_scope(&self, scope: Uuid) {
        match self.entries.lock() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|key, _| key.scope != scope);
                let dropped = before - entries.len();
                if dropped > 0 {
                    tracing::debug!(%scope, dropped, "cache scope invalidated");
                }
            }
            Err(_) => {
                // Poisoned entries can no longer be served (`live` fails the
                // same way), so the invariant holds without the cleanup.
                tracing::warn!(%scope, "cache poisoned during invalidation");
            }
        }
    }

    /// Current number of entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A live (non-expired) payload for the key, if any.
    fn live(&self, key: &CacheKey) -> Option<Payload> {
        match self.try_live(key) {
            Ok(hit) => hit,
            Err(error) => {
                tracing::warn!(%error, "cache read failed; falling back to direct read");
                None
            }
        }
    }

    fn try_live(&self, key: &CacheKey) -> Result<Option<Payload>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let now = Instant::now();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.payload.clone()))
    }

    /// Stores a fresh payload, purging expired entries first and evicting
    /// the oldest fifth when still at capacity.
    fn remember(&self, key: CacheKey, payload: Payload) {
        if let Err(error) = self.try_remember(key, payload) {
            tracing::warn!(%error, "cache write failed; result served uncached");
        }
    }

    fn try_remember(&self, key: CacheKey, payload: Payload) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let now = Instant::now();
        entries.retain(|_, entry| !entry.is_expired(now));

        if entries.len() >= self.capacity {
            let mut by_age: Vec<(CacheKey, Instant)> = entries
                .iter()
                .map(|(key, entry)| (*key, entry.inserted_at))
                .collect();
            by_age.sort_by_key(|(_, inserted_at)| *inserted_at);
            let evict = (self.capacity / CACHE_EVICTION_DIVISOR).max(1);
            for (old_key, _) in by_age.into_iter().take(evict) {
                entries.remove(&old_key);
            }
            tracing::debug!(evicted = evict, "cache at capacity, evicted oldest entries");
        }

        entries.insert(
            key,
            Entry {
                payload,
                inserted_at: now,
                ttl: self.ttl,
            },
        );
        Ok(())
    }
}

/// Tiny helper for the common "horizon starting today" booking range.
#[must_use]
pub fn horizon_range(now: DateTime<Utc>, horizon_days: u32) -> DateRange {
    let today = now.date_naive();
    let last = today
        .checked_add_days(chrono::Days::new(u64::from(horizon_days.saturating_sub(1))))
        .unwrap_or(today);
    DateRange::new(today, last)
}
