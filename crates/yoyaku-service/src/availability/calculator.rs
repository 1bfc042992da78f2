//! Raw slot generation from a weekly schedule.
//!
//! Pure: schedule snapshot + horizon + reference instant in, candidate
//! slots out. Classification against bookings, breaks, and the clock
//! happens in the resolver.

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc};

use yoyaku_core::time::minute_of_day;
use yoyaku_store::model::{DaySchedule, ScheduleConfig};

use crate::error::ServiceResult;

use super::slot::{CandidateDay, CandidateSlot};

/// ## Summary
/// Generates candidate slots for `horizon_days` days starting on `now`'s
/// date. Days outside the schedule's validity window, inside a vacation
/// range, or marked non-working are skipped entirely. Within a working day
/// the walk steps from start to end in slot-duration increments and drops a
/// final partial step.
///
/// ## Errors
/// `ValidationError` if the schedule's structural invariants do not hold;
/// no day is produced in that case.
pub fn candidate_slots(
    schedule: &ScheduleConfig,
    horizon_days: u32,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<CandidateDay>> {
    schedule.validate()?;

    let today = now.date_naive();
    let mut days = Vec::new();
    for offset in 0..horizon_days {
        let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !schedule.in_validity(date) || schedule.is_vacation(date) {
            continue;
        }
        let day = schedule.day(date.weekday());
        if !day.working {
            continue;
        }
        days.push(CandidateDay {
            date,
            slots: walk_day(date, day, schedule.slot_duration_minutes),
        });
    }

    tracing::debug!(
        provider_id = %schedule.provider_id,
        horizon_days,
        produced_days = days.len(),
        "candidate slots generated"
    );
    Ok(days)
}

/// Steps through one working day. Slots never span midnight; the schedule
/// model cannot even express a window that would.
fn walk_day(
    date: chrono::NaiveDate,
    day: &DaySchedule,
    duration_minutes: u32,
) -> Vec<CandidateSlot> {
    let start_minute = minute_of_day(day.start);
    let end_minute = minute_of_day(day.end);

    let mut slots = Vec::with_capacity(((end_minute - start_minute) / duration_minutes) as usize);
    let mut cursor = start_minute;
    while cursor + duration_minutes <= end_minute {
        let Some(start) = NaiveTime::from_hms_opt(cursor / 60, cursor % 60, 0) else {
            break;
        };
        slots.push(CandidateSlot {
            start,
            start_at: date.and_time(start).and_utc(),
        });
        cursor += duration_minutes;
    }
    slots
}
