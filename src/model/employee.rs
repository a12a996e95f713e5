use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    /// Fixed at registration; there is no promotion flow.
    pub role: Role,
}

/// The authenticated identity behind a status-engine call. Supplied by the
/// session collaborator on every call, never read from ambient state.
#[derive(Debug, Copy, Clone)]
pub struct Actor {
    pub id: u64,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&Employee> for Actor {
    fn from(emp: &Employee) -> Self {
        Actor {
            id: emp.id,
            role: emp.role,
        }
    }
}
