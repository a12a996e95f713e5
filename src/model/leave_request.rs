use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::utils::dates::duration_days;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
    Personal,
    Maternity,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl LeaveStatus {
    /// APPROVED, DENIED and CANCELLED are terminal; only PENDING transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Decision {
    Approve,
    Deny,
}

/// Submission payload as it arrives from the web layer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeave {
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Inclusive day count, so a single-day leave is 1.
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }

    pub(crate) fn set_status(&mut self, status: LeaveStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
