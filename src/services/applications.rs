//! Applications: candidates apply and follow up, HR reviews.

use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::job_offers::JobOffer;
use super::{Person, authorized, lenient_date};
use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::documents::DocumentChoice;
use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub ai_score_explanation: Option<String>,
    #[serde(default)]
    pub candidate: Option<Person>,
    #[serde(default)]
    pub job_offer: Option<JobOffer>,
}

/// Outcome HR assigns to an application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    Accepted,
    Rejected,
    Pending,
}

impl ReviewStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Pending => "PENDING",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown review status: {0}")]
pub struct UnknownReviewStatus(pub String);

impl FromStr for ReviewStatus {
    type Err = UnknownReviewStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            "PENDING" => Ok(Self::Pending),
            _ => Err(UnknownReviewStatus(s.to_owned())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyBody {
    candidate_id: i64,
    job_offer_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_letter: Option<String>,
}

/// Apply to `job_offer_id`. [`DocumentChoice::Default`] leaves the document
/// out so the backend uses the one on the candidate's profile.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] when a chosen file cannot be read, otherwise
/// see [`ApiClient::send`].
pub async fn apply(
    client: &ApiClient,
    candidate_id: i64,
    job_offer_id: i64,
    resume: &DocumentChoice,
    cover_letter: &DocumentChoice,
) -> Result<Application, ApiError> {
    let body = ApplyBody {
        candidate_id,
        job_offer_id,
        resume: resume.resolve().await.map_err(|e| ApiError::InvalidRequest(e.to_string()))?,
        cover_letter: cover_letter
            .resolve()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?,
    };
    let request = ApiRequest::post("/candidates/apply").json(&body)?;
    let application: Application = client.send(authorized(client, request)).await?;
    info!(application_id = application.id, candidate_id, job_offer_id, "applied to job offer");
    Ok(application)
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn for_candidate(client: &ApiClient, candidate_id: i64) -> Result<Vec<Application>, ApiError> {
    let request = ApiRequest::get(format!("/candidates/{candidate_id}/applications"));
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn for_offer(client: &ApiClient, job_offer_id: i64) -> Result<Vec<Application>, ApiError> {
    let request = ApiRequest::get(format!("/hr/joboffers/{job_offer_id}/applications"));
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn review(client: &ApiClient, application_id: i64, status: ReviewStatus) -> Result<(), ApiError> {
    let request = ApiRequest::put(format!("/hr/applications/{application_id}/review")).query("status", status);
    let _: IgnoredAny = client.send(authorized(client, request)).await?;
    info!(application_id, %status, "application reviewed");
    Ok(())
}
