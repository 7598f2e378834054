//! The session record issued by `POST /auth/login`.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Identity plus bearer token of the logged-in user.
///
/// The same shape is persisted under the `user` storage key. `id` and `role`
/// are required; the remaining identity fields tolerate `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Numeric user identifier.
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    /// Opaque bearer token. A record without one is not a session.
    #[serde(default)]
    pub token: Option<String>,
}

impl SessionRecord {
    /// True when the record carries a usable (non-empty) token.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// "First Last", falling back to the username, then the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.username
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| format!("user #{}", self.id))
    }

    /// Merge a profile-edit response into this record.
    ///
    /// Identity fields are replaced wholesale. The role stays the session's
    /// role, and the current token is kept unless the update reissued one.
    #[must_use]
    pub fn merged_with(&self, update: ProfileUpdate) -> Self {
        Self {
            id: update.id.unwrap_or(self.id),
            email: update.email,
            username: update.username,
            role: self.role,
            firstname: update.firstname,
            lastname: update.lastname,
            token: update.token.filter(|t| !t.is_empty()).or_else(|| self.token.clone()),
        }
    }
}

/// Profile returned by the profile-edit endpoints. It may omit the token
/// and the role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
