use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::security::sanitize_for_display;

/// Closed set of portal roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }

    /// Display name given to identities fabricated by a plain login
    pub fn demo_display_name(&self) -> &'static str {
        match self {
            Role::Patient => "Demo User",
            Role::Doctor => "Dr. Demo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a form submits something other than `patient` or `doctor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role: '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    // Form values are exact; "Doctor" or " patient" are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The signed-in principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Opaque identifier
    pub id: String,
    /// Name shown in the navigation bar and dashboards (unescaped)
    pub display_name: String,
    pub email: String,
    pub role: Role,
    /// When this identity was installed in the session
    pub signed_in_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: email.into(),
            role,
            signed_in_at: Utc::now(),
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    pub fn is_patient(&self) -> bool {
        self.role == Role::Patient
    }

    /// Display name escaped for embedding in markup.
    /// Every view rendering `display_name` must go through this.
    pub fn display_name_html(&self) -> String {
        sanitize_for_display(&self.display_name)
    }
}
