//! Unit tests for conflict resolution and slot classification.

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, TimeZone, Utc};
    use uuid::Uuid;

    use yoyaku_store::model::{Booking, BookingStatus, BreakInterval};

    use crate::availability::calculator::candidate_slots;
    use crate::availability::resolver::resolve;
    use crate::availability::slot::{Availability, Slot, UnavailableReason};
    use crate::test_support::{monday, monday_at, sunday_noon, weekday_schedule};

    fn booking_at(
        provider_id: Uuid,
        start_at: chrono::DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            provider_id,
            subject_id: Uuid::new_v4(),
            start_at,
            status,
            status_changed_at: now,
            status_changed_by: None,
            cancellation_reason: None,
            completion_notes: None,
            link_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn slot_at<'a>(slots: &'a [Slot], hour: u32, minute: u32) -> &'a Slot {
        slots
            .iter()
            .find(|slot| slot.start == NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
            .expect("slot present")
    }

    #[test]
    fn test_reference_scenario_sixteen_slots_one_booked() {
        // Mon-Fri 09:00-17:00, 30-minute slots, one Scheduled booking
        // Monday 10:00, queried the day before.
        let provider_id = Uuid::new_v4();
        let schedule = weekday_schedule(provider_id, 30);
        let candidates = candidate_slots(&schedule, 2, sunday_noon()).expect("generate");
        let bookings = vec![booking_at(
            provider_id,
            monday_at(10, 0),
            BookingStatus::Scheduled,
        )];

        let view = resolve(&schedule, candidates, &bookings, sunday_noon());

        assert_eq!(view.days.len(), 1);
        let day = &view.days[0];
        assert_eq!(day.date, monday());
        assert_eq!(day.slots.len(), 16);

        let booked: Vec<&Slot> = day
            .slots
            .iter()
            .filter(|slot| {
                slot.availability == Availability::Unavailable(UnavailableReason::Booked)
            })
            .collect();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(
            day.slots
                .iter()
                .filter(|slot| slot.availability.is_available())
                .count(),
            15
        );
        assert_eq!(view.available_days, vec![monday()]);
    }

    #[test]
    fn test_booked_wins_over_break() {
        let provider_id = Uuid::new_v4();
        let mut schedule = weekday_schedule(provider_id, 30);
        for day in &mut schedule.week {
            day.breaks.push(BreakInterval {
                start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            });
        }
        let candidates = candidate_slots(&schedule, 2, sunday_noon()).expect("generate");
        let bookings = vec![booking_at(
            provider_id,
            monday_at(12, 0),
            BookingStatus::Scheduled,
        )];

        let view = resolve(&schedule, candidates, &bookings, sunday_noon());
        let slots = &view.days[0].slots;

        // The booked slot inside the break reports Booked, its neighbour
        // inside the break reports Break.
        assert_eq!(
            slot_at(slots, 12, 0).availability,
            Availability::Unavailable(UnavailableReason::Booked)
        );
        assert_eq!(
            slot_at(slots, 12, 30).availability,
            Availability::Unavailable(UnavailableReason::Break)
        );
    }

    #[test]
    fn test_break_overlap_is_strict() {
        let provider_id = Uuid::new_v4();
        let mut schedule = weekday_schedule(provider_id, 30);
        for day in &mut schedule.week {
            day.breaks.push(BreakInterval {
                start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            });
        }
        let candidates = candidate_slots(&schedule, 2, sunday_noon()).expect("generate");
        let view = resolve(&schedule, candidates, &[], sunday_noon());
        let slots = &view.days[0].slots;

        // Slots touching the break endpoints do not overlap it.
        assert!(slot_at(slots, 11, 30).availability.is_available());
        assert!(slot_at(slots, 13, 0).availability.is_available());
        assert_eq!(
            slot_at(slots, 12, 0).availability,
            Availability::Unavailable(UnavailableReason::Break)
        );
        assert_eq!(
            slot_at(slots, 12, 30).availability,
            Availability::Unavailable(UnavailableReason::Break)
        );
    }

    #[test]
    fn test_past_applies_only_to_today() {
        let provider_id = Uuid::new_v4();
        let schedule = weekday_schedule(provider_id, 30);
        // Monday 12:05: the morning is gone, the afternoon is not.
        let now = monday_at(12, 5);
        let candidates = candidate_slots(&schedule, 2, now).expect("generate");
        let view = resolve(&schedule, candidates, &[], now);

        let today = &view.days[0];
        assert_eq!(today.date, monday());
        assert_eq!(
            slot_at(&today.slots, 9, 0).availability,
            Availability::Unavailable(UnavailableReason::Past)
        );
        assert_eq!(
            slot_at(&today.slots, 12, 0).availability,
            Availability::Unavailable(UnavailableReason::Past)
        );
        assert!(slot_at(&today.slots, 12, 30).availability.is_available());

        // Tomorrow's morning is untouched.
        let tuesday = &view.days[1];
        assert!(slot_at(&tuesday.slots, 9, 0).availability.is_available());
    }

    #[test]
    fn test_break_wins_over_past() {
        let provider_id = Uuid::new_v4();
        let mut schedule = weekday_schedule(provider_id, 30);
        for day in &mut schedule.week {
            day.breaks.push(BreakInterval {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            });
        }
        let now = monday_at(12, 5);
        let candidates = candidate_slots(&schedule, 1, now).expect("generate");
        let view = resolve(&schedule, candidates, &[], now);

        // 9:00 is both past and inside the break: Break has priority.
        assert_eq!(
            slot_at(&view.days[0].slots, 9, 0).availability,
            Availability::Unavailable(UnavailableReason::Break)
        );
    }

    #[test]
    fn test_non_blocking_statuses_do_not_occupy() {
        let provider_id = Uuid::new_v4();
        let schedule = weekday_schedule(provider_id, 30);
        let candidates = candidate_slots(&schedule, 2, sunday_noon()).expect("generate");
        let bookings = vec![
            booking_at(provider_id, monday_at(10, 0), BookingStatus::Cancelled),
            booking_at(provider_id, monday_at(10, 30), BookingStatus::Checked),
            booking_at(provider_id, monday_at(11, 0), BookingStatus::InProgress),
        ];

        let view = resolve(&schedule, candidates, &bookings, sunday_noon());
        let slots = &view.days[0].slots;

        assert!(slot_at(slots, 10, 0).availability.is_available());
        assert!(slot_at(slots, 10, 30).availability.is_available());
        // InProgress still blocks.
        assert_eq!(
            slot_at(slots, 11, 0).availability,
            Availability::Unavailable(UnavailableReason::Booked)
        );
    }

    #[test]
    fn test_booking_matching_is_minute_granular() {
        let provider_id = Uuid::new_v4();
        let schedule = weekday_schedule(provider_id, 30);
        let candidates = candidate_slots(&schedule, 2, sunday_noon()).expect("generate");
        // Seconds on the booking instant must not defeat the match.
        let bookings = vec![booking_at(
            provider_id,
            Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 42).unwrap(),
            BookingStatus::Scheduled,
        )];

        let view = resolve(&schedule, candidates, &bookings, sunday_noon());
        assert_eq!(
            slot_at(&view.days[0].slots, 10, 0).availability,
            Availability::Unavailable(UnavailableReason::Booked)
        );
    }

    #[test]
    fn test_fully_booked_day_leaves_navigation() {
        let provider_id = Uuid::new_v4();
        let schedule = weekday_schedule(provider_id, 30);
        let candidates = candidate_slots(&schedule, 3, sunday_noon()).expect("generate");
        // Occupy all sixteen Monday slots.
        let bookings: Vec<Booking> = (0..16)
            .map(|index| {
                booking_at(
                    provider_id,
                    monday_at(9 + index / 2, (index % 2) * 30),
                    BookingStatus::Scheduled,
                )
            })
            .collect();

        let view = resolve(&schedule, candidates, &bookings, sunday_noon());
        assert_eq!(view.days.len(), 2);
        // Monday drops out of the available-day navigation, Tuesday stays.
        assert_eq!(
            view.available_days,
            vec![monday().succ_opt().expect("tuesday")]
        );
    }
}
