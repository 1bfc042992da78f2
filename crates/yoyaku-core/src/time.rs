//! Canonical instant handling.
//!
//! Every instant the engine stores or compares is UTC truncated to the
//! minute. Seconds and sub-second components are dropped at the boundary so
//! that slot/booking equality is a plain `==` on `DateTime<Utc>` rather than
//! a field-by-field comparison.

use chrono::{DateTime, NaiveTime, Timelike, Utc};

/// ## Summary
/// Truncates an instant to its canonical minute (UTC, seconds and
/// nanoseconds zeroed).
#[must_use]
pub fn canonical_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    let secs = at.timestamp();
    // Always representable: we only ever shave seconds off a valid instant.
    DateTime::<Utc>::from_timestamp(secs - secs.rem_euclid(60), 0).unwrap_or(at)
}

/// ## Summary
/// Returns true if the instant is already minute-granular.
#[must_use]
pub fn is_canonical(at: DateTime<Utc>) -> bool {
    at.second() == 0 && at.nanosecond() == 0
}

/// ## Summary
/// Minutes since midnight for a wall-clock time, ignoring seconds.
#[must_use]
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
