//! Typed wrappers for the backend endpoints each page drives.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every function here builds an [`ApiRequest`], attaches the session's
//! bearer token and hands it to [`ApiClient::send`]. Nothing is cached:
//! pages call again when they want fresh data. Errors are the client's
//! [`ApiError`]s unchanged, so a 401 from any of these has already cleared
//! the session by the time the caller sees it.

pub mod admin;
pub mod applications;
pub mod interviews;
pub mod job_offers;
pub mod notifications;

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;

/// Attach the active session's token, if any.
pub(crate) fn authorized(client: &ApiClient, request: ApiRequest) -> ApiRequest {
    let token = client.session().token();
    request.bearer(token.as_deref())
}

/// A user as embedded in other payloads (candidate, recruiter, recipient).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub phone: Option<i64>,
}

impl Person {
    #[must_use]
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            self.username.clone().unwrap_or_default()
        } else {
            parts.join(" ")
        }
    }
}

/// Dates arrive either as ISO strings or as epoch milliseconds depending on
/// the backend's serializer settings; keep them as display strings.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
