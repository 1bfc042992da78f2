use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use yoyaku_store::model::BookingStatus;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    StoreError(#[from] yoyaku_store::StoreError),

    #[error(transparent)]
    CoreError(#[from] yoyaku_core::error::CoreError),

    #[error("booking not found: {0}")]
    NotFound(Uuid),

    #[error("no schedule configured for provider {0}")]
    ScheduleNotFound(Uuid),

    /// The state machine rejected the requested transition. Names both
    /// statuses so the caller can show exactly what was attempted.
    #[error("transition from {from} to {to} is not allowed")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// A race was detected at commit time; the displayed availability is
    /// stale. The caller must recompute availability and offer another
    /// time.
    #[error("slot for provider {provider_id} at {start_at} is no longer available")]
    SlotTaken {
        provider_id: Uuid,
        start_at: DateTime<Utc>,
    },

    /// The underlying status write failed; no partial state was left
    /// behind.
    #[error("status transition could not be committed")]
    TransitionFailed(#[source] yoyaku_store::StoreError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
