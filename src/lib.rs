//! Validation and status engine for a leave-request tracker.
//!
//! Pure decision functions ([`engine::validator`], [`engine::status`]) over
//! caller-supplied state, plus a thin [`service::LeaveService`] that wires
//! them to injectable persistence ([`store::LeaveStore`]) and time
//! ([`clock::Clock`]) collaborators. HTTP, sessions, and the database driver
//! live in the embedding application.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Policy;
pub use engine::status::{PendingStats, SweepReport};
pub use engine::validator::{ValidatedLeave, validate_new};
pub use error::{Rejection, ServiceError, TransitionError};
pub use model::employee::{Actor, Employee, Role};
pub use model::leave_request::{CreateLeave, Decision, LeaveRequest, LeaveStatus, LeaveType};
pub use service::LeaveService;
pub use store::{InMemoryStore, LeaveStore};
