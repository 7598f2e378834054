//! Job offers: public listing, candidate search and HR management.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{authorized, lenient_date};
use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl JobOffer {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("closed"))
    }
}

/// Every offer, no login required.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn list_public(client: &ApiClient) -> Result<Vec<JobOffer>, ApiError> {
    client.send(ApiRequest::get("/joboffers")).await
}

/// Candidate search. A blank keyword lists everything.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn search(client: &ApiClient, keyword: Option<&str>) -> Result<Vec<JobOffer>, ApiError> {
    let mut request = ApiRequest::get("/candidates/search");
    if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
        request = request.query("keyword", keyword);
    }
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn list_managed(client: &ApiClient) -> Result<Vec<JobOffer>, ApiError> {
    client.send(authorized(client, ApiRequest::get("/hr/joboffers"))).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn publish(client: &ApiClient, offer: &JobOffer) -> Result<JobOffer, ApiError> {
    let request = ApiRequest::post("/hr/joboffers/publish").json(offer)?;
    let published: JobOffer = client.send(authorized(client, request)).await?;
    info!(offer_id = ?published.id, title = %published.title, "job offer published");
    Ok(published)
}

/// # Errors
///
/// [`ApiError::InvalidRequest`] when `offer` has no id.
pub async fn update(client: &ApiClient, offer: &JobOffer) -> Result<JobOffer, ApiError> {
    if offer.id.is_none() {
        return Err(ApiError::InvalidRequest("job offer update requires an id".into()));
    }
    let request = ApiRequest::put("/hr/joboffers/update").json(offer)?;
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn close(client: &ApiClient, offer_id: i64) -> Result<JobOffer, ApiError> {
    let request = ApiRequest::put(format!("/hr/joboffers/{offer_id}/close"));
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn delete(client: &ApiClient, offer_id: i64) -> Result<(), ApiError> {
    let request = ApiRequest::delete(format!("/hr/joboffers/{offer_id}"));
    let _: IgnoredAny = client.send(authorized(client, request)).await?;
    info!(offer_id, "job offer deleted");
    Ok(())
}
