//! Unit tests for commit-time booking validation.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use yoyaku_store::model::{BookingStatus, NewBooking};
    use yoyaku_store::store::BookingStore;

    use crate::booking::{BookingRequest, BookingService};
    use crate::cache::AppointmentCache;
    use crate::error::ServiceError;
    use crate::test_support::{CountingStore, monday_at, sunday_noon};

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn service(store: &Arc<CountingStore>, cache: &Arc<AppointmentCache>) -> BookingService {
        BookingService::new(
            store.clone(),
            Arc::clone(cache),
            TIMEOUT,
        )
    }

    fn cache() -> Arc<AppointmentCache> {
        Arc::new(AppointmentCache::new(Duration::from_secs(300), 1000))
    }

    fn request(provider_id: Uuid, subject_id: Uuid) -> BookingRequest {
        BookingRequest {
            provider_id,
            subject_id,
            start_at: monday_at(10, 0),
            link_id: None,
        }
    }

    #[test_log::test(tokio::test)]
    async fn book_creates_a_scheduled_booking() {
        let store = Arc::new(CountingStore::new());
        let booking_service = service(&store, &cache());
        let provider_id = Uuid::new_v4();
        let subject_id = Uuid::new_v4();

        let booking = booking_service
            .book(request(provider_id, subject_id), sunday_noon())
            .await
            .expect("book");

        assert_eq!(booking.provider_id, provider_id);
        assert_eq!(booking.subject_id, subject_id);
        assert_eq!(booking.status, BookingStatus::Scheduled);
        assert_eq!(booking.start_at, monday_at(10, 0));
        assert_eq!(store.blocking_probes(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn book_normalizes_the_instant_to_the_minute() {
        let store = Arc::new(CountingStore::new());
        let booking_service = service(&store, &cache());

        let mut req = request(Uuid::new_v4(), Uuid::new_v4());
        req.start_at = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 31).unwrap();

        let booking = booking_service
            .book(req, sunday_noon())
            .await
            .expect("book");
        assert_eq!(booking.start_at, monday_at(10, 0));
    }

    #[test_log::test(tokio::test)]
    async fn book_rejects_an_occupied_slot() {
        let store = Arc::new(CountingStore::new());
        let booking_service = service(&store, &cache());
        let provider_id = Uuid::new_v4();

        booking_service
            .book(request(provider_id, Uuid::new_v4()), sunday_noon())
            .await
            .expect("first booking");

        let rival = booking_service
            .book(request(provider_id, Uuid::new_v4()), sunday_noon())
            .await;
        assert!(matches!(
            rival,
            Err(ServiceError::SlotTaken { provider_id: p, .. }) if p == provider_id
        ));
    }

    #[test_log::test(tokio::test)]
    async fn book_rejects_a_past_instant() {
        let store = Arc::new(CountingStore::new());
        let booking_service = service(&store, &cache());

        let result = booking_service
            .book(request(Uuid::new_v4(), Uuid::new_v4()), monday_at(10, 30))
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test_log::test(tokio::test)]
    async fn book_probes_the_store_even_when_the_cache_is_warm() {
        let store = Arc::new(CountingStore::new());
        let shared_cache = cache();
        let booking_service = service(&store, &shared_cache);
        let provider_id = Uuid::new_v4();

        // Warm the provider scope with an empty booking list, then occupy
        // the slot behind the cache's back.
        let range = crate::cache::horizon_range(sunday_noon(), 14);
        shared_cache
            .bookings_for_provider(store.as_ref(), provider_id, range, TIMEOUT)
            .await
            .expect("warm cache");
        store
            .inner
            .insert(NewBooking {
                provider_id,
                subject_id: Uuid::new_v4(),
                start_at: monday_at(10, 0),
                status: BookingStatus::Scheduled,
                link_id: None,
            })
            .await
            .expect("direct insert");

        // The stale cache says the slot is free; the validator must not
        // believe it.
        let result = booking_service
            .book(request(provider_id, Uuid::new_v4()), sunday_noon())
            .await;
        assert!(matches!(result, Err(ServiceError::SlotTaken { .. })));
    }

    #[test_log::test(tokio::test)]
    async fn book_invalidates_the_affected_cache_scopes() {
        let store = Arc::new(CountingStore::new());
        let shared_cache = cache();
        let booking_service = service(&store, &shared_cache);
        let provider_id = Uuid::new_v4();
        let subject_id = Uuid::new_v4();
        let range = crate::cache::horizon_range(sunday_noon(), 14);

        shared_cache
            .bookings_for_provider(store.as_ref(), provider_id, range, TIMEOUT)
            .await
            .expect("warm provider scope");
        shared_cache
            .bookings_for_subject(store.as_ref(), subject_id, TIMEOUT)
            .await
            .expect("warm subject scope");
        assert_eq!(store.provider_reads(), 1);
        assert_eq!(store.subject_reads(), 1);

        booking_service
            .book(request(provider_id, subject_id), sunday_noon())
            .await
            .expect("book");

        // Both scopes were dropped: the next reads go to the store and see
        // the new booking.
        let provider_bookings = shared_cache
            .bookings_for_provider(store.as_ref(), provider_id, range, TIMEOUT)
            .await
            .expect("re-read provider");
        let subject_bookings = shared_cache
            .bookings_for_subject(store.as_ref(), subject_id, TIMEOUT)
            .await
            .expect("re-read subject");
        assert_eq!(store.provider_reads(), 2);
        assert_eq!(store.subject_reads(), 2);
        assert_eq!(provider_bookings.len(), 1);
        assert_eq!(subject_bookings.len(), 1);
    }
}
