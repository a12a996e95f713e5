use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Policy;
use crate::engine::validator::approved_overlap;
use crate::error::TransitionError;
use crate::model::employee::Actor;
use crate::model::leave_request::{Decision, LeaveRequest, LeaveStatus};

/// Outcome of one sweep pass, for reporting back to whatever triggered it.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub cancelled_count: usize,
    pub cancelled_ids: Vec<Uuid>,
}

/// Age breakdown of the pending backlog, relative to `now`.
#[derive(Debug, Clone, Serialize)]
pub struct PendingStats {
    pub total_pending: usize,
    /// Older than the staleness threshold; next sweep cancels these.
    pub overdue_for_cancellation: usize,
    pub week_old: usize,
    pub recent: usize,
}

const WEEK_OLD_DAYS: i64 = 7;
const RECENT_DAYS: i64 = 3;

/// Employee withdraws their own PENDING request.
pub fn cancel(
    request: &mut LeaveRequest,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    ensure_pending(request)?;

    if actor.id != request.employee_id {
        return Err(TransitionError::Forbidden(
            "only the owning employee can cancel a request",
        ));
    }

    request.set_status(LeaveStatus::Cancelled, now);
    tracing::info!(request_id = %request.id, employee_id = request.employee_id, "leave request cancelled by owner");
    Ok(())
}

/// Admin approves or denies a PENDING request.
///
/// The approve path re-runs the overlap check against `others` (the
/// employee's other requests as currently persisted): the set it was
/// validated against at submission may be stale by decision time, and two
/// overlapping pending requests must not both end up APPROVED. Deny skips the
/// re-check.
pub fn decide(
    request: &mut LeaveRequest,
    actor: &Actor,
    decision: Decision,
    others: &[LeaveRequest],
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    ensure_pending(request)?;

    if !actor.is_admin() {
        return Err(TransitionError::Forbidden(
            "only an admin can approve or deny requests",
        ));
    }

    let next = match decision {
        Decision::Approve => {
            if let Some(conflict) = approved_overlap(
                others,
                request.start_date,
                request.end_date,
                Some(request.id),
            ) {
                return Err(TransitionError::OverlapConflict {
                    conflicting_id: conflict.id,
                });
            }
            LeaveStatus::Approved
        }
        Decision::Deny => LeaveStatus::Denied,
    };

    request.set_status(next, now);
    tracing::info!(
        request_id = %request.id,
        employee_id = request.employee_id,
        admin_id = actor.id,
        status = %request.status,
        "leave request decided"
    );
    Ok(())
}

/// Cancels every PENDING request strictly older than the staleness threshold.
/// Idempotent: swept requests leave PENDING, so a second pass over the same
/// data reports zero. Never fails; an empty report is the quiet case.
pub fn sweep(requests: &mut [LeaveRequest], now: DateTime<Utc>, policy: &Policy) -> SweepReport {
    let cutoff = now - Duration::days(policy.stale_after_days);

    let mut cancelled_ids = Vec::new();
    for request in requests.iter_mut() {
        if request.status == LeaveStatus::Pending && request.created_at < cutoff {
            request.set_status(LeaveStatus::Cancelled, now);
            cancelled_ids.push(request.id);
        }
    }

    if !cancelled_ids.is_empty() {
        tracing::info!(
            cancelled_count = cancelled_ids.len(),
            stale_after_days = policy.stale_after_days,
            "auto-cancelled stale pending leave requests"
        );
    }

    SweepReport {
        cancelled_count: cancelled_ids.len(),
        cancelled_ids,
    }
}

/// Age-bucketed counts over the PENDING set, for admin dashboards.
pub fn pending_stats(requests: &[LeaveRequest], now: DateTime<Utc>, policy: &Policy) -> PendingStats {
    let stale_cutoff = now - Duration::days(policy.stale_after_days);
    let week_cutoff = now - Duration::days(WEEK_OLD_DAYS);
    let recent_cutoff = now - Duration::days(RECENT_DAYS);

    let pending = requests
        .iter()
        .filter(|r| r.status == LeaveStatus::Pending)
        .collect::<Vec<_>>();

    PendingStats {
        total_pending: pending.len(),
        overdue_for_cancellation: pending
            .iter()
            .filter(|r| r.created_at < stale_cutoff)
            .count(),
        week_old: pending
            .iter()
            .filter(|r| r.created_at < week_cutoff && r.created_at >= stale_cutoff)
            .count(),
        recent: pending
            .iter()
            .filter(|r| r.created_at >= recent_cutoff)
            .count(),
    }
}

fn ensure_pending(request: &LeaveRequest) -> Result<(), TransitionError> {
    if request.status.is_terminal() {
        return Err(TransitionError::InvalidState {
            current: request.status,
        });
    }
    Ok(())
}
