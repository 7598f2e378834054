//! HR notifications to candidates and project managers.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Person, authorized, lenient_date};
use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, alias = "message")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub sending_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub recipient: Option<Person>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecipientType {
    Candidate,
    Pm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingNotification {
    pub message: String,
    pub status: String,
    pub recipient_id: i64,
    pub recipient_type: RecipientType,
}

impl OutgoingNotification {
    #[must_use]
    pub fn new(message: &str, recipient_id: i64, recipient_type: RecipientType) -> Self {
        Self {
            message: message.to_owned(),
            status: "Sent".to_owned(),
            recipient_id,
            recipient_type,
        }
    }
}

/// Notifications HR has sent.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn list(client: &ApiClient) -> Result<Vec<Notification>, ApiError> {
    client.send(authorized(client, ApiRequest::get("/hr/notifications"))).await
}

/// # Errors
///
/// [`ApiError::InvalidRequest`] for a blank message, otherwise see
/// [`ApiClient::send_text`].
pub async fn send(client: &ApiClient, notification: &OutgoingNotification) -> Result<(), ApiError> {
    if notification.message.trim().is_empty() {
        return Err(ApiError::InvalidRequest("notification message is empty".into()));
    }
    let request = ApiRequest::post("/hr/notifications/send").json(notification)?;
    client.send_text(authorized(client, request)).await?;
    info!(recipient_id = notification.recipient_id, "notification sent");
    Ok(())
}

/// Candidates HR can notify.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn candidates(client: &ApiClient) -> Result<Vec<Person>, ApiError> {
    client.send(authorized(client, ApiRequest::get("/candidates"))).await
}
