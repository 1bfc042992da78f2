//! Weekly schedule configuration.
//!
//! A `ScheduleConfig` is fetched once per availability computation and
//! treated as an immutable snapshot; the engine never writes it.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yoyaku_core::error::{CoreError, CoreResult};
use yoyaku_core::time::minute_of_day;

/// Inclusive date range, used for vacations and booking queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A pause inside a working day during which no slot may be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Working hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub working: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub breaks: Vec<BreakInterval>,
}

impl DaySchedule {
    /// A non-working day entry.
    #[must_use]
    pub fn off() -> Self {
        Self {
            working: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            breaks: Vec::new(),
        }
    }

    /// A working day without breaks.
    #[must_use]
    pub const fn working(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            working: true,
            start,
            end,
            breaks: Vec::new(),
        }
    }

    /// Working span in minutes; zero for non-working days.
    #[must_use]
    pub fn span_minutes(&self) -> u32 {
        if !self.working || self.end <= self.start {
            return 0;
        }
        minute_of_day(self.end) - minute_of_day(self.start)
    }
}

/// Weekly schedule for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub provider_id: Uuid,
    pub slot_duration_minutes: u32,
    /// First date on which slots may be offered.
    pub valid_from: NaiveDate,
    /// Last date on which slots may be offered (inclusive).
    pub valid_until: NaiveDate,
    /// Per-weekday entries, Monday first.
    pub week: [DaySchedule; 7],
    pub vacations: Vec<DateRange>,
}

impl ScheduleConfig {
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.week[weekday.num_days_from_monday() as usize]
    }

    #[must_use]
    pub fn in_validity(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_until
    }

    #[must_use]
    pub fn is_vacation(&self, date: NaiveDate) -> bool {
        self.vacations.iter().any(|range| range.contains(date))
    }

    /// ## Summary
    /// Checks the structural invariants of the schedule: positive slot
    /// duration shorter than every working day's span, ordered working
    /// hours, ordered breaks, and an ordered validity window.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` naming the first violated rule.
    pub fn validate(&self) -> CoreResult<()> {
        if self.slot_duration_minutes == 0 {
            return Err(CoreError::ValidationError(
                "slot duration must be greater than zero".into(),
            ));
        }
        if self.valid_from > self.valid_until {
            return Err(CoreError::ValidationError(format!(
                "validity window starts {} after it ends {}",
                self.valid_from, self.valid_until
            )));
        }
        for (index, day) in self.week.iter().enumerate() {
            if !day.working {
                continue;
            }
            if day.start >= day.end {
                return Err(CoreError::ValidationError(format!(
                    "weekday {index}: working hours start {} at or after end {}",
                    day.start, day.end
                )));
            }
            if self.slot_duration_minutes >= day.span_minutes() {
                return Err(CoreError::ValidationError(format!(
                    "weekday {index}: slot duration {} min does not fit the {} min working span",
                    self.slot_duration_minutes,
                    day.span_minutes()
                )));
            }
            for brk in &day.breaks {
                if brk.start >= brk.end {
                    return Err(CoreError::ValidationError(format!(
                        "weekday {index}: break starts {} at or after end {}",
                        brk.start, brk.end
                    )));
                }
            }
        }
        for range in &self.vacations {
            if range.from > range.to {
                return Err(CoreError::ValidationError(format!(
                    "vacation range starts {} after it ends {}",
                    range.from, range.to
                )));
            }
        }
        Ok(())
    }
}
