use std::collections::HashMap;

use uuid::Uuid;

use crate::model::employee::Employee;
use crate::model::leave_request::LeaveRequest;

/// Persistence seam for the engine.
///
/// Isolation contract an implementation must honor (the pure engine functions
/// cannot enforce this themselves):
/// - `update` of a status change must be serializable per request row: of two
///   concurrent decisions on the same request, one must observe the other's
///   committed status and fail the pending-state check.
/// - Approvals for the same employee must be serialized relative to each
///   other, so two overlapping requests cannot both pass the decision-time
///   overlap re-check.
/// - A sweep writing CANCELLED must not clobber a concurrent user-driven
///   transition (optimistic versioning on the status field or equivalent).
pub trait LeaveStore {
    fn employee(&self, id: u64) -> Option<Employee>;

    fn request(&self, id: Uuid) -> Option<LeaveRequest>;

    /// Every request owned by one employee, any status.
    fn requests_for_employee(&self, employee_id: u64) -> Vec<LeaveRequest>;

    /// The global request set, for the sweep and admin views.
    fn all_requests(&self) -> Vec<LeaveRequest>;

    fn insert(&mut self, request: LeaveRequest);

    /// Replaces the stored request with the same id.
    fn update(&mut self, request: &LeaveRequest);
}

/// Single-process store backing the test suites and small embedders. Behind
/// `&mut self` every operation is trivially serialized, which satisfies the
/// trait's isolation contract.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    employees: HashMap<u64, Employee>,
    requests: Vec<LeaveRequest>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id, employee);
    }
}

impl LeaveStore for InMemoryStore {
    fn employee(&self, id: u64) -> Option<Employee> {
        self.employees.get(&id).cloned()
    }

    fn request(&self, id: Uuid) -> Option<LeaveRequest> {
        self.requests.iter().find(|r| r.id == id).cloned()
    }

    fn requests_for_employee(&self, employee_id: u64) -> Vec<LeaveRequest> {
        self.requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn all_requests(&self) -> Vec<LeaveRequest> {
        self.requests.clone()
    }

    fn insert(&mut self, request: LeaveRequest) {
        self.requests.push(request);
    }

    fn update(&mut self, request: &LeaveRequest) {
        if let Some(slot) = self.requests.iter_mut().find(|r| r.id == request.id) {
            *slot = request.clone();
        }
    }
}
