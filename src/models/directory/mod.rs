// Directory module
// Read-only patient/doctor records plus the acting session context.
// The engine looks these up but never owns or mutates the directories.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Patient {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match over name and phone, as typed
    /// into the create-flow search box.
    pub fn matches(&self, query: &str) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.first_name,
            self.last_name,
            self.phone.as_deref().unwrap_or("")
        )
        .to_lowercase();
        haystack.contains(&query.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }

    pub fn matches(&self, query: &str) -> bool {
        let haystack = format!("{} {}", self.first_name, self.last_name).to_lowercase();
        haystack.contains(&query.to_lowercase())
    }
}

/// Clinic staff role carried by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    BranchManager,
    Receptionist,
    Doctor,
}

impl Role {
    /// Whether this role may pick an arbitrary doctor (filtering or
    /// booking). A doctor-role session is always pinned to itself.
    pub fn can_choose_doctor(&self) -> bool {
        !matches!(self, Role::Doctor)
    }
}

/// The acting user, injected once per session rather than read from
/// ambient storage. Invalidated on logout by dropping the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}
