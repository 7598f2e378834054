//! Admin console: user management, platform statistics, scoring model.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::authorized;
use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::auth::MIN_PASSWORD_LEN;
use crate::error::ApiError;
use crate::session::role::Role;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<i64>,
    #[serde(default)]
    pub education: Option<String>,
}

/// Staff account created (or edited) by an admin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
}

fn create_endpoint(role: Role) -> Result<&'static str, ApiError> {
    match role {
        Role::Hr => Ok("/admin/create-hr"),
        Role::Pm => Ok("/admin/create-pm"),
        other => Err(ApiError::InvalidRequest(format!("admins cannot create {other} accounts"))),
    }
}

fn list_endpoint(role: Role) -> Result<&'static str, ApiError> {
    match role {
        Role::Hr => Ok("/admin/hr-users"),
        Role::Pm => Ok("/admin/pm-users"),
        Role::Candidate => Ok("/admin/candidates"),
        Role::Admin => Err(ApiError::InvalidRequest("admin accounts are not listed".into())),
    }
}

/// # Errors
///
/// [`ApiError::InvalidRequest`] unless `user.role` is HR or PM.
pub async fn create_user(client: &ApiClient, user: &NewUser) -> Result<UserSummary, ApiError> {
    let endpoint = create_endpoint(user.role)?;
    let request = ApiRequest::post(endpoint).json(user)?;
    let created: UserSummary = client.send(authorized(client, request)).await?;
    info!(user_id = created.id, role = %user.role, "admin: user created");
    Ok(created)
}

/// # Errors
///
/// [`ApiError::InvalidRequest`] for [`Role::Admin`].
pub async fn list_users(client: &ApiClient, role: Role) -> Result<Vec<UserSummary>, ApiError> {
    let endpoint = list_endpoint(role)?;
    client.send(authorized(client, ApiRequest::get(endpoint))).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn update_user(client: &ApiClient, user_id: i64, user: &NewUser) -> Result<UserSummary, ApiError> {
    let request = ApiRequest::put(format!("/admin/users/{user_id}"))
        .query("role", user.role)
        .json(user)?;
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn delete_user(client: &ApiClient, user_id: i64, role: Role) -> Result<(), ApiError> {
    let request = ApiRequest::delete(format!("/admin/users/{user_id}")).query("role", role);
    let _: IgnoredAny = client.send(authorized(client, request)).await?;
    warn!(user_id, %role, "admin: user deleted");
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    user_id: String,
    role: Role,
    new_password: &'a str,
}

/// # Errors
///
/// [`ApiError::InvalidRequest`] for a password shorter than
/// [`MIN_PASSWORD_LEN`].
pub async fn reset_password(client: &ApiClient, user_id: i64, role: Role, new_password: &str) -> Result<(), ApiError> {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::InvalidRequest("Password must be at least 6 characters long".into()));
    }
    let body = ResetPasswordBody { user_id: user_id.to_string(), role, new_password };
    let request = ApiRequest::post("/admin/reset-password").json(&body)?;
    let _: IgnoredAny = client.send(authorized(client, request)).await?;
    info!(user_id, %role, "admin: password reset");
    Ok(())
}

/// Platform counters, passed through as the backend shapes them.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn statistics(client: &ApiClient) -> Result<Value, ApiError> {
    client.send(authorized(client, ApiRequest::get("/admin/statistics"))).await
}

// =============================================================================
// SCORING MODEL
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrainRequest {
    pub training_size: u32,
    pub test_size: f64,
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self { training_size: 100, test_size: 0.2 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TrainingOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl TrainingOutcome {
    /// Message to show when training did not succeed.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        if self.success {
            return None;
        }
        Some(self.error.clone().unwrap_or_else(|| "Training failed".to_owned()))
    }
}

/// # Errors
///
/// See [`ApiClient::send`]. A backend that answers 2xx with
/// `success: false` is not an error; check [`TrainingOutcome::failure_message`].
pub async fn train_model(client: &ApiClient, params: &TrainRequest) -> Result<TrainingOutcome, ApiError> {
    let request = ApiRequest::post("/admin/ml/train").json(params)?;
    let outcome: TrainingOutcome = client.send(authorized(client, request)).await?;
    if let Some(message) = outcome.failure_message() {
        warn!(%message, "admin: model training failed");
    }
    Ok(outcome)
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn model_info(client: &ApiClient) -> Result<Value, ApiError> {
    client.send(authorized(client, ApiRequest::get("/admin/ml/info"))).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn model_status(client: &ApiClient) -> Result<Value, ApiError> {
    client.send(authorized(client, ApiRequest::get("/admin/ml/status"))).await
}
