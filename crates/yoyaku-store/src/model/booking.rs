use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reservation of one slot on a provider's calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub subject_id: Uuid,
    /// Canonical minute-granular instant of the reserved slot.
    pub start_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub status_changed_at: DateTime<Utc>,
    pub status_changed_by: Option<Uuid>,
    /// Set when the booking reaches `Cancelled`.
    pub cancellation_reason: Option<String>,
    /// Set when the booking reaches `Checked`.
    pub completion_notes: Option<String>,
    /// Opaque reference to a collaborator-owned record (e.g. an intake
    /// document); the engine only stores it.
    pub link_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    InProgress,
    Checked,
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Checked => "checked",
            Self::Cancelled => "cancelled",
        }
    }

    /// A blocking status occupies its slot and excludes any other blocking
    /// booking at the same (provider, instant).
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }

    /// Terminal statuses permit no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checked | Self::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insert struct for creating new bookings
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub provider_id: Uuid,
    pub subject_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub link_id: Option<Uuid>,
}

/// Field set applied by a status transition.
///
/// Applied together with its history entry as one atomic store operation;
/// a status change without a history row must never be observable.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: BookingStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
    pub completion_notes: Option<String>,
}
