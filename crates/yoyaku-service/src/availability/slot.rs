//! Slot types shared by the calculator and the conflict resolver.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a slot cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    Booked,
    Break,
    Past,
}

/// Exhaustive slot state. One tagged variant instead of parallel boolean
/// flags, so precedence between reasons is total and explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

impl Availability {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// A slot as emitted by the calculator: placed, not yet classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub start: NaiveTime,
    /// Canonical minute-granular instant of the slot start.
    pub start_at: DateTime<Utc>,
}

/// One day's worth of candidate slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDay {
    pub date: NaiveDate,
    pub slots: Vec<CandidateSlot>,
}

/// A fully classified slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub start_at: DateTime<Utc>,
    pub availability: Availability,
}

/// One day of the final availability view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

/// The resolved horizon: per-day slot lists plus the days that still have
/// something bookable, for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailabilityView {
    pub days: Vec<DayAvailability>,
    pub available_days: Vec<NaiveDate>,
}
