use uuid::Uuid;

use crate::clock::Clock;
use crate::config::Policy;
use crate::engine::status::{self, PendingStats, SweepReport};
use crate::engine::validator;
use crate::error::{ServiceError, TransitionError};
use crate::model::employee::Actor;
use crate::model::leave_request::{CreateLeave, Decision, LeaveRequest};
use crate::store::LeaveStore;

/// Ties the pure engine to the persistence and clock collaborators: fetch the
/// state a decision needs, run the check, persist the outcome. The identity
/// collaborator shows up as the explicit `Actor` on every transition call.
pub struct LeaveService<S, C> {
    store: S,
    clock: C,
    policy: Policy,
}

impl<S: LeaveStore, C: Clock> LeaveService<S, C> {
    pub fn new(store: S, clock: C, policy: Policy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Validates a submission and persists it as PENDING.
    pub fn submit(&mut self, payload: CreateLeave) -> Result<LeaveRequest, ServiceError> {
        let employee_id = payload.employee_id;
        if self.store.employee(employee_id).is_none() {
            return Err(ServiceError::UnknownEmployee(employee_id));
        }

        let existing = self.store.requests_for_employee(employee_id);
        let validated =
            validator::validate_new(payload, &existing, self.clock.today(), &self.policy)
                .map_err(|reason| {
                    tracing::warn!(employee_id, code = reason.code(), "leave submission rejected");
                    reason
                })?;

        let request = validated.into_request(self.clock.now());
        self.store.insert(request.clone());
        tracing::info!(request_id = %request.id, employee_id, "leave request submitted");
        Ok(request)
    }

    /// Employee withdraws their own pending request.
    pub fn cancel(&mut self, request_id: Uuid, actor: &Actor) -> Result<LeaveRequest, ServiceError> {
        let mut request = self
            .store
            .request(request_id)
            .ok_or(ServiceError::RequestNotFound(request_id))?;

        status::cancel(&mut request, actor, self.clock.now())?;
        self.store.update(&request);
        Ok(request)
    }

    /// Admin approves or denies a pending request. The overlap re-check runs
    /// against the employee's requests as persisted right now, not the set
    /// seen at submission.
    pub fn decide(
        &mut self,
        request_id: Uuid,
        actor: &Actor,
        decision: Decision,
    ) -> Result<LeaveRequest, ServiceError> {
        let mut request = self
            .store
            .request(request_id)
            .ok_or(ServiceError::RequestNotFound(request_id))?;

        let others = self.store.requests_for_employee(request.employee_id);
        status::decide(&mut request, actor, decision, &others, self.clock.now())?;
        self.store.update(&request);
        Ok(request)
    }

    /// Cancels stale pending requests. Triggered externally (timer or admin
    /// endpoint); never fails, an empty report means nothing qualified.
    pub fn sweep(&mut self) -> SweepReport {
        let mut requests = self.store.all_requests();
        let report = status::sweep(&mut requests, self.clock.now(), &self.policy);

        for request in &requests {
            if report.cancelled_ids.contains(&request.id) {
                self.store.update(request);
            }
        }
        report
    }

    /// Age breakdown of the pending backlog, for admin dashboards only.
    pub fn pending_stats(&self, actor: &Actor) -> Result<PendingStats, ServiceError> {
        if !actor.is_admin() {
            return Err(ServiceError::Transition(TransitionError::Forbidden(
                "only an admin can view pending statistics",
            )));
        }
        Ok(status::pending_stats(
            &self.store.all_requests(),
            self.clock.now(),
            &self.policy,
        ))
    }

    /// Admins see every request, employees only their own.
    pub fn list(&self, actor: &Actor) -> Vec<LeaveRequest> {
        if actor.is_admin() {
            self.store.all_requests()
        } else {
            self.store.requests_for_employee(actor.id)
        }
    }
}
