use uuid::Uuid;

use crate::model::leave_request::LeaveStatus;

/// Why a proposed leave request was refused admission. These are expected
/// business outcomes, not faults; the web layer renders them as 400s keyed by
/// [`Rejection::code`].
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("end date must not be before start date")]
    InvalidRange,

    #[error("leave must start after the submission date")]
    NotInFuture,

    #[error("leave of {days} days exceeds the {max_days} day limit")]
    DurationExceeded { days: i64, max_days: i64 },

    #[error("overlaps approved leave request {conflicting_id}")]
    OverlapConflict { conflicting_id: Uuid },
}

impl Rejection {
    /// Stable reason code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::InvalidRange => "INVALID_RANGE",
            Rejection::NotInFuture => "NOT_IN_FUTURE",
            Rejection::DurationExceeded { .. } => "DURATION_EXCEEDED",
            Rejection::OverlapConflict { .. } => "OVERLAP_CONFLICT",
        }
    }
}

/// Why a cancel/decide call on an existing request was refused.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("request is {current}, only pending requests can change state")]
    InvalidState { current: LeaveStatus },

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("overlaps approved leave request {conflicting_id}")]
    OverlapConflict { conflicting_id: Uuid },
}

impl TransitionError {
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::InvalidState { .. } => "INVALID_STATE_TRANSITION",
            TransitionError::Forbidden(_) => "FORBIDDEN",
            TransitionError::OverlapConflict { .. } => "OVERLAP_CONFLICT",
        }
    }
}

/// Failures surfaced by [`crate::service::LeaveService`], which also has to
/// resolve ids against the store before the pure checks run.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("no employee with id {0}")]
    UnknownEmployee(u64),

    #[error("no leave request with id {0}")]
    RequestNotFound(Uuid),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
