//! Conflict resolution: candidate slots × blocking bookings → final view.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};

use yoyaku_core::time::{canonical_minute, minute_of_day};
use yoyaku_store::model::{Booking, DaySchedule, ScheduleConfig};

use super::slot::{
    Availability, AvailabilityView, CandidateDay, DayAvailability, Slot, UnavailableReason,
};

/// ## Summary
/// Classifies every candidate slot against the provider's blocking bookings,
/// the weekday's break intervals, and the clock. The priority order is
/// fixed (Booked over Break over Past over Available) and evaluation
/// stops at the first match.
///
/// Bookings whose status is not blocking are ignored; a cancelled booking
/// frees its slot by simply no longer matching.
#[must_use]
pub fn resolve(
    schedule: &ScheduleConfig,
    candidates: Vec<CandidateDay>,
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> AvailabilityView {
    let occupied: HashSet<DateTime<Utc>> = bookings
        .iter()
        .filter(|booking| booking.status.is_blocking())
        .map(|booking| canonical_minute(booking.start_at))
        .collect();

    let today = now.date_naive();
    let duration_minutes = schedule.slot_duration_minutes;

    let mut days = Vec::with_capacity(candidates.len());
    let mut available_days = Vec::new();
    for candidate in candidates {
        let day_schedule = schedule.day(candidate.date.weekday());
        let slots: Vec<Slot> = candidate
            .slots
            .iter()
            .map(|slot| Slot {
                date: candidate.date,
                start: slot.start,
                start_at: slot.start_at,
                availability: classify(
                    slot.start_at,
                    minute_of_day(slot.start),
                    duration_minutes,
                    &occupied,
                    day_schedule,
                    candidate.date == today,
                    now,
                ),
            })
            .collect();

        if slots.iter().any(|slot| slot.availability.is_available()) {
            available_days.push(candidate.date);
        }
        days.push(DayAvailability {
            date: candidate.date,
            slots,
        });
    }

    AvailabilityView {
        days,
        available_days,
    }
}

/// First match wins: Booked > Break > Past > Available.
fn classify(
    start_at: DateTime<Utc>,
    start_minute: u32,
    duration_minutes: u32,
    occupied: &HashSet<DateTime<Utc>>,
    day: &DaySchedule,
    is_today: bool,
    now: DateTime<Utc>,
) -> Availability {
    if occupied.contains(&start_at) {
        return Availability::Unavailable(UnavailableReason::Booked);
    }
    let end_minute = start_minute + duration_minutes;
    let in_break = day.breaks.iter().any(|brk| {
        start_minute < minute_of_day(brk.end) && end_minute > minute_of_day(brk.start)
    });
    if in_break {
        return Availability::Unavailable(UnavailableReason::Break);
    }
    if is_today && start_at < now {
        return Availability::Unavailable(UnavailableReason::Past);
    }
    Availability::Available
}
