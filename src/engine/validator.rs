use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::config::Policy;
use crate::error::Rejection;
use crate::model::leave_request::{CreateLeave, LeaveRequest, LeaveStatus};
use crate::utils::dates::{duration_days, overlaps};

/// Proof that a submission passed [`validate_new`]. The only way to mint a
/// PENDING [`LeaveRequest`] is through [`ValidatedLeave::into_request`], so
/// nothing unvalidated reaches the store.
#[derive(Debug)]
pub struct ValidatedLeave(CreateLeave);

impl ValidatedLeave {
    pub fn into_request(self, now: DateTime<Utc>) -> LeaveRequest {
        let CreateLeave {
            employee_id,
            leave_type,
            start_date,
            end_date,
            reason,
        } = self.0;

        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id,
            leave_type,
            start_date,
            end_date,
            reason,
            status: LeaveStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Decides admissibility of a proposed leave. Pure: the caller supplies the
/// employee's existing requests and the submission date, and persists the
/// result on success.
///
/// Checks run in a fixed order and the first failure wins, so the caller can
/// always render one precise reason:
///
/// 1. `end_date >= start_date`, else INVALID_RANGE
/// 2. `start_date > today`, else NOT_IN_FUTURE
/// 3. inclusive duration within the policy cap, else DURATION_EXCEEDED
/// 4. no APPROVED request for the same employee overlapping the proposed
///    range, else OVERLAP_CONFLICT
///
/// Only APPROVED requests block; the employee's own PENDING requests do not.
pub fn validate_new(
    payload: CreateLeave,
    existing: &[LeaveRequest],
    today: NaiveDate,
    policy: &Policy,
) -> Result<ValidatedLeave, Rejection> {
    if payload.end_date < payload.start_date {
        return Err(Rejection::InvalidRange);
    }

    if payload.start_date <= today {
        return Err(Rejection::NotInFuture);
    }

    let days = duration_days(payload.start_date, payload.end_date);
    if days > policy.max_duration_days {
        return Err(Rejection::DurationExceeded {
            days,
            max_days: policy.max_duration_days,
        });
    }

    if let Some(conflict) = approved_overlap(
        existing,
        payload.start_date,
        payload.end_date,
        None,
    ) {
        return Err(Rejection::OverlapConflict {
            conflicting_id: conflict.id,
        });
    }

    Ok(ValidatedLeave(payload))
}

/// First APPROVED request in `existing` whose inclusive range intersects
/// [start, end], skipping `exclude` (the request under decision, when the
/// approve path re-checks). Shared with the status engine.
pub(crate) fn approved_overlap<'a>(
    existing: &'a [LeaveRequest],
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<Uuid>,
) -> Option<&'a LeaveRequest> {
    existing.iter().find(|req| {
        req.status == LeaveStatus::Approved
            && Some(req.id) != exclude
            && overlaps(req.start_date, req.end_date, start, end)
    })
}
