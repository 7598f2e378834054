//! The four fixed user roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role carried by a session. Roles are flat: no role implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Candidate,
    Hr,
    Pm,
    Admin,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Candidate, Self::Hr, Self::Pm, Self::Admin];

    /// Wire name, as the backend spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "CANDIDATE",
            Self::Hr => "HR",
            Self::Pm => "PM",
            Self::Admin => "ADMIN",
        }
    }

    /// Page a freshly logged-in user of this role lands on.
    #[must_use]
    pub fn landing_route(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Hr => "/hr",
            Self::Pm => "/pm",
            Self::Candidate => "/offer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}` (expected CANDIDATE, HR, PM or ADMIN)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;
