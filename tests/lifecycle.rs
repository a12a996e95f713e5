use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use leave_engine::{
    Actor, CreateLeave, Decision, Employee, FixedClock, InMemoryStore, LeaveService, LeaveStatus,
    LeaveStore, LeaveType, Policy, Rejection, Role, ServiceError, TransitionError,
};
use uuid::Uuid;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn now() -> DateTime<Utc> {
    // "Today" is 2025-05-01 for every scenario.
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn service() -> LeaveService<InMemoryStore, FixedClock> {
    init_tracing();
    let mut store = InMemoryStore::new();
    store.add_employee(Employee {
        id: 1,
        name: "Alice".to_string(),
        role: Role::Employee,
    });
    store.add_employee(Employee {
        id: 2,
        name: "Bob".to_string(),
        role: Role::Employee,
    });
    store.add_employee(Employee {
        id: 9,
        name: "Dana".to_string(),
        role: Role::Admin,
    });
    LeaveService::new(store, FixedClock(now()), Policy::default())
}

fn alice() -> Actor {
    Actor {
        id: 1,
        role: Role::Employee,
    }
}

fn bob() -> Actor {
    Actor {
        id: 2,
        role: Role::Employee,
    }
}

fn admin() -> Actor {
    Actor {
        id: 9,
        role: Role::Admin,
    }
}

fn leave(employee_id: u64, start: &str, end: &str) -> CreateLeave {
    CreateLeave {
        employee_id,
        leave_type: LeaveType::Annual,
        start_date: d(start),
        end_date: d(end),
        reason: Some("trip".to_string()),
    }
}

/// Backdates a stored request so sweep scenarios can age it.
fn age_request(svc: &mut LeaveService<InMemoryStore, FixedClock>, id: Uuid, days: i64) {
    let mut req = svc.store().request(id).unwrap();
    req.created_at = req.created_at - Duration::days(days);
    svc.store_mut().update(&req);
}

#[test]
fn submission_lands_pending_and_visible_to_owner() {
    let mut svc = service();
    let req = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();

    assert_eq!(req.status, LeaveStatus::Pending);
    assert_eq!(req.duration_days(), 5);

    let own = svc.list(&alice());
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, req.id);
    assert!(svc.list(&bob()).is_empty());
    assert_eq!(svc.list(&admin()).len(), 1);
}

#[test]
fn unknown_employee_is_refused_before_validation() {
    let mut svc = service();
    let err = svc.submit(leave(404, "2025-06-01", "2025-06-05")).unwrap_err();
    assert_eq!(err, ServiceError::UnknownEmployee(404));
}

#[test]
fn submission_overlapping_approved_leave_is_rejected() {
    let mut svc = service();
    let first = svc.submit(leave(1, "2025-06-01", "2025-06-10")).unwrap();
    svc.decide(first.id, &admin(), Decision::Approve).unwrap();

    // Shares 2025-06-10 with the approved leave.
    let err = svc.submit(leave(1, "2025-06-10", "2025-06-15")).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rejected(Rejection::OverlapConflict {
            conflicting_id: first.id
        })
    );

    // Starts the day after it ends.
    assert!(svc.submit(leave(1, "2025-06-11", "2025-06-15")).is_ok());

    // Another employee is free to book the same range.
    assert!(svc.submit(leave(2, "2025-06-05", "2025-06-08")).is_ok());
}

#[test]
fn two_pending_non_overlapping_requests_both_get_approved() {
    let mut svc = service();
    let first = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();
    let second = svc.submit(leave(1, "2025-06-10", "2025-06-12")).unwrap();

    assert_eq!(
        svc.decide(first.id, &admin(), Decision::Approve).unwrap().status,
        LeaveStatus::Approved
    );
    assert_eq!(
        svc.decide(second.id, &admin(), Decision::Approve).unwrap().status,
        LeaveStatus::Approved
    );
}

#[test]
fn second_of_two_overlapping_pending_requests_cannot_be_approved() {
    let mut svc = service();

    // Both validate cleanly: pending requests do not block submission.
    let first = svc.submit(leave(1, "2025-06-01", "2025-06-10")).unwrap();
    let second = svc.submit(leave(1, "2025-06-08", "2025-06-12")).unwrap();

    svc.decide(first.id, &admin(), Decision::Approve).unwrap();

    let err = svc
        .decide(second.id, &admin(), Decision::Approve)
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Transition(TransitionError::OverlapConflict {
            conflicting_id: first.id
        })
    );

    // Still pending, so the admin can deny it instead.
    let denied = svc.decide(second.id, &admin(), Decision::Deny).unwrap();
    assert_eq!(denied.status, LeaveStatus::Denied);
}

#[test]
fn transition_authorization_is_policed() {
    let mut svc = service();
    let req = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();

    // An employee cannot decide, not even their own request.
    let err = svc.decide(req.id, &alice(), Decision::Approve).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::Forbidden(_))
    ));

    // A different employee cannot cancel it.
    let err = svc.cancel(req.id, &bob()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::Forbidden(_))
    ));

    // The owner can.
    let cancelled = svc.cancel(req.id, &alice()).unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
}

#[test]
fn terminal_states_admit_no_further_transitions() {
    let mut svc = service();
    let req = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();
    svc.decide(req.id, &admin(), Decision::Deny).unwrap();

    let err = svc.cancel(req.id, &alice()).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Transition(TransitionError::InvalidState {
            current: LeaveStatus::Denied
        })
    );

    let err = svc.decide(req.id, &admin(), Decision::Approve).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Transition(TransitionError::InvalidState {
            current: LeaveStatus::Denied
        })
    );
}

#[test]
fn missing_request_reports_not_found() {
    let mut svc = service();
    let ghost = Uuid::new_v4();
    assert_eq!(
        svc.cancel(ghost, &alice()).unwrap_err(),
        ServiceError::RequestNotFound(ghost)
    );
}

#[test]
fn sweep_cancels_stale_pending_and_is_idempotent() {
    let mut svc = service();
    let stale = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();
    let fresh = svc.submit(leave(1, "2025-06-10", "2025-06-12")).unwrap();
    age_request(&mut svc, stale.id, 11);
    age_request(&mut svc, fresh.id, 9);

    let report = svc.sweep();
    assert_eq!(report.cancelled_count, 1);
    assert_eq!(report.cancelled_ids, vec![stale.id]);

    assert_eq!(
        svc.store().request(stale.id).unwrap().status,
        LeaveStatus::Cancelled
    );
    assert_eq!(
        svc.store().request(fresh.id).unwrap().status,
        LeaveStatus::Pending
    );

    let second = svc.sweep();
    assert_eq!(second.cancelled_count, 0);
    assert!(second.cancelled_ids.is_empty());
}

#[test]
fn swept_request_cannot_be_decided_afterwards() {
    let mut svc = service();
    let stale = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();
    age_request(&mut svc, stale.id, 12);
    svc.sweep();

    let err = svc
        .decide(stale.id, &admin(), Decision::Approve)
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Transition(TransitionError::InvalidState {
            current: LeaveStatus::Cancelled
        })
    );
}

#[test]
fn pending_stats_reflect_the_backlog() {
    let mut svc = service();
    let overdue = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();
    let _recent = svc.submit(leave(1, "2025-06-10", "2025-06-12")).unwrap();
    age_request(&mut svc, overdue.id, 12);

    let stats = svc.pending_stats(&admin()).unwrap();
    assert_eq!(stats.total_pending, 2);
    assert_eq!(stats.overdue_for_cancellation, 1);
    assert_eq!(stats.recent, 1);

    svc.sweep();
    let stats = svc.pending_stats(&admin()).unwrap();
    assert_eq!(stats.total_pending, 1);
    assert_eq!(stats.overdue_for_cancellation, 0);
}

#[test]
fn pending_stats_are_admin_only() {
    let mut svc = service();
    svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();

    let err = svc.pending_stats(&alice()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::Forbidden(_))
    ));
    assert!(matches!(
        &err,
        ServiceError::Transition(t) if t.code() == "FORBIDDEN"
    ));

    assert!(svc.pending_stats(&admin()).is_ok());
}

#[test]
fn wire_shapes_use_stable_uppercase_names() {
    let mut svc = service();
    let req = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["leave_type"], "ANNUAL");
    assert_eq!(json["start_date"], "2025-06-01");

    let report = svc.sweep();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["cancelled_count"], 0);
    assert!(json["cancelled_ids"].as_array().unwrap().is_empty());

    // Reason codes are the API contract.
    assert_eq!(Rejection::InvalidRange.code(), "INVALID_RANGE");
    assert_eq!(Rejection::NotInFuture.code(), "NOT_IN_FUTURE");
    assert_eq!(
        TransitionError::InvalidState {
            current: LeaveStatus::Cancelled
        }
        .code(),
        "INVALID_STATE_TRANSITION"
    );
}

#[test]
fn custom_policy_limits_are_honored() {
    let mut store = InMemoryStore::new();
    store.add_employee(Employee {
        id: 1,
        name: "Alice".to_string(),
        role: Role::Employee,
    });
    let policy = Policy {
        max_duration_days: 5,
        stale_after_days: 2,
    };
    let mut svc = LeaveService::new(store, FixedClock(now()), policy);

    let err = svc.submit(leave(1, "2025-06-01", "2025-06-06")).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rejected(Rejection::DurationExceeded {
            days: 6,
            max_days: 5
        })
    );

    let req = svc.submit(leave(1, "2025-06-01", "2025-06-05")).unwrap();
    age_request(&mut svc, req.id, 3);
    assert_eq!(svc.sweep().cancelled_count, 1);
}
