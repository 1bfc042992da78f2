use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::model::BookingStatus;

/// Persistence layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A second blocking booking was attempted at an occupied
    /// (provider, instant) pair. This is the store-level uniqueness
    /// guarantee that backs the race-safe commit path.
    #[error("blocking booking already exists for provider {provider_id} at {start_at}")]
    UniquenessViolation {
        provider_id: Uuid,
        start_at: DateTime<Utc>,
    },

    #[error("booking not found: {0}")]
    NotFound(Uuid),

    /// The booking's status changed between read and write. The losing
    /// transition fails whole; nothing is applied.
    #[error("booking {booking_id} status changed concurrently (expected {expected}, found {actual})")]
    StaleStatus {
        booking_id: Uuid,
        expected: BookingStatus,
        actual: BookingStatus,
    },

    /// A persistence call exceeded its bounded timeout. Callers may retry a
    /// bounded number of times; the core never retries on its own.
    #[error("persistence call timed out: {0}")]
    Timeout(&'static str),

    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    CoreError(#[from] yoyaku_core::error::CoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
