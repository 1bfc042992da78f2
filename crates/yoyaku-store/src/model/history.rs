use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the append-only status audit trail.
///
/// Entries are never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub old_status: super::BookingStatus,
    pub new_status: super::BookingStatus,
    pub actor_id: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
    /// Cancellation reason or completion notes, depending on the target
    /// status.
    pub detail: Option<String>,
}

/// Insert struct for appending audit entries
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub booking_id: Uuid,
    pub old_status: super::BookingStatus,
    pub new_status: super::BookingStatus,
    pub actor_id: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
    pub detail: Option<String>,
}
