//! Login, registration and profile editing.
//!
//! SYSTEM CONTEXT
//! ==============
//! These flows sit between the pages and [`ApiClient`]: they shape the
//! request bodies, translate backend rejections into messages a form can
//! show, and push the outcome into the [`SessionStore`].
//!
//! ERROR HANDLING
//! ==============
//! A failed login is not a session expiry: the call opts out of the 401
//! interception so a wrong password never bounces the user through the
//! forced-logout path.

use serde::Serialize;
use tracing::info;

use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::error::{ApiError, ErrorCode};
use crate::session::record::{ProfileUpdate, SessionRecord};
use crate::session::role::Role;

pub const LOGIN_REJECTED_MESSAGE: &str = "Invalid email/username or password. Please try again.";
pub const SERVER_UNREACHABLE_MESSAGE: &str = "Unable to connect to server. Please check your connection.";

/// Shortest password the profile form accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),

    #[error("Unable to connect to server. Please check your connection.")]
    Unreachable,

    /// The backend accepted the credentials but issued no token.
    #[error("login response carried no token")]
    MissingToken,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("{0} accounts cannot edit their profile")]
    ProfileUnsupported(Role),

    #[error(transparent)]
    Invalid(#[from] ProfileFormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "E_LOGIN_REJECTED",
            Self::Unreachable => "E_UNREACHABLE",
            Self::MissingToken => "E_MISSING_TOKEN",
            Self::NotLoggedIn => "E_NOT_LOGGED_IN",
            Self::ProfileUnsupported(_) => "E_PROFILE_UNSUPPORTED",
            Self::Invalid(e) => e.error_code(),
            Self::Api(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Unreachable)
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email_or_username: String,
    pub password: String,
    pub role: Role,
}

/// Authenticate and make the returned user the active session.
///
/// # Errors
///
/// [`AuthError::Rejected`] with the server's message (or a generic one) when
/// the credentials are refused, [`AuthError::Unreachable`] when no response
/// arrives.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<SessionRecord, AuthError> {
    let request = ApiRequest::post("/auth/login")
        .json(credentials)?
        .without_unauthorized_intercept();
    let record: SessionRecord = client.send(request).await.map_err(login_failure)?;
    if !record.has_token() {
        return Err(AuthError::MissingToken);
    }
    info!(user_id = record.id, role = %record.role, "auth: login accepted");
    client.session().login(record.clone());
    Ok(record)
}

fn login_failure(err: ApiError) -> AuthError {
    match err {
        ApiError::Transport(_) => AuthError::Unreachable,
        ApiError::Domain { status, message } if message == format!("HTTP error {status}") => {
            AuthError::Rejected(LOGIN_REJECTED_MESSAGE.to_owned())
        }
        ApiError::Domain { message, .. } => AuthError::Rejected(message),
        ApiError::Unauthorized => AuthError::Rejected(LOGIN_REJECTED_MESSAGE.to_owned()),
        other => AuthError::Api(other),
    }
}

/// Clear the session. The caller decides where to navigate.
pub fn logout(client: &ApiClient) {
    client.session().logout();
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<i64>,
}

/// Create a candidate account. Does not log in.
///
/// # Errors
///
/// Propagates the backend's rejection message.
pub async fn register_candidate(client: &ApiClient, registration: &Registration) -> Result<serde_json::Value, AuthError> {
    let request = ApiRequest::post("/candidates/create")
        .json(registration)?
        .without_unauthorized_intercept();
    let created = client.send(request).await?;
    info!(email = %registration.email, "auth: candidate registered");
    Ok(created)
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileFormError {
    #[error("Please enter your current password to change it")]
    CurrentPasswordRequired,
    #[error("Please enter a new password")]
    NewPasswordRequired,
    #[error("New password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("New passwords do not match")]
    PasswordMismatch,
    #[error("New password must be different from current password")]
    PasswordUnchanged,
}

impl ErrorCode for ProfileFormError {
    fn error_code(&self) -> &'static str {
        "E_PROFILE_INVALID"
    }
}

/// Profile edit form. Empty strings count as "not provided".
#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub phone: Option<i64>,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    #[must_use]
    pub fn changes_password(&self) -> bool {
        !self.new_password.is_empty() || !self.confirm_password.is_empty()
    }

    /// Password-change rules; a form that leaves both new-password fields
    /// blank always passes.
    ///
    /// # Errors
    ///
    /// The first rule the form breaks.
    pub fn validate(&self) -> Result<(), ProfileFormError> {
        if !self.changes_password() {
            return Ok(());
        }
        if self.current_password.is_empty() {
            return Err(ProfileFormError::CurrentPasswordRequired);
        }
        if self.new_password.is_empty() {
            return Err(ProfileFormError::NewPasswordRequired);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProfileFormError::PasswordTooShort);
        }
        if self.new_password != self.confirm_password {
            return Err(ProfileFormError::PasswordMismatch);
        }
        if self.current_password == self.new_password {
            return Err(ProfileFormError::PasswordUnchanged);
        }
        Ok(())
    }

    fn payload(&self, role: Role) -> ProfilePayload<'_> {
        let (current_password, new_password) = if self.new_password.is_empty() {
            (None, None)
        } else {
            (Some(self.current_password.as_str()), Some(self.new_password.as_str()))
        };
        // HR accounts cannot change their email or phone.
        let candidate = role == Role::Candidate;
        ProfilePayload {
            firstname: non_empty(&self.firstname),
            lastname: non_empty(&self.lastname),
            username: non_empty(&self.username),
            email: non_empty(&self.email).filter(|_| candidate),
            phone: self.phone.filter(|_| candidate),
            current_password,
            new_password,
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload<'a> {
    firstname: Option<&'a str>,
    lastname: Option<&'a str>,
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_password: Option<&'a str>,
}

/// Profile endpoint for a role, if that role has one.
#[must_use]
pub fn profile_endpoint(role: Role, user_id: i64) -> Option<String> {
    match role {
        Role::Candidate => Some(format!("/candidates/{user_id}/profile")),
        Role::Hr => Some(format!("/hr/{user_id}/profile")),
        Role::Pm | Role::Admin => None,
    }
}

/// Validate `form`, submit it, and fold the response into the session.
///
/// # Errors
///
/// Validation failures are returned before any request is made.
pub async fn update_profile(client: &ApiClient, form: &ProfileForm) -> Result<SessionRecord, AuthError> {
    let user = client.session().current_user().ok_or(AuthError::NotLoggedIn)?;
    let endpoint = profile_endpoint(user.role, user.id).ok_or(AuthError::ProfileUnsupported(user.role))?;
    form.validate()?;

    let request = ApiRequest::put(endpoint)
        .json(&form.payload(user.role))?
        .bearer(client.session().token().as_deref());
    let update: ProfileUpdate = client.send(request).await?;
    let record = client.session().refresh_profile(update).ok_or(AuthError::NotLoggedIn)?;
    info!(user_id = record.id, "auth: profile updated");
    Ok(record)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
