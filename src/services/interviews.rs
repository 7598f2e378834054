//! Interviews: HR planning, candidate view, project-manager evaluation.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Person, authorized, lenient_date};
use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub recruiter: Option<Person>,
    #[serde(default)]
    pub candidate: Option<Person>,
}

/// Body of an interview create/update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPlan {
    pub interview_date: String,
    pub meeting_link: String,
    pub status: String,
    pub result: String,
}

impl InterviewPlan {
    /// A freshly planned interview awaiting its result.
    #[must_use]
    pub fn planned(interview_date: &str, meeting_link: &str) -> Self {
        Self {
            interview_date: interview_date.to_owned(),
            meeting_link: meeting_link.to_owned(),
            status: "Planned".to_owned(),
            result: "Pending".to_owned(),
        }
    }
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn list(client: &ApiClient) -> Result<Vec<Interview>, ApiError> {
    client.send(authorized(client, ApiRequest::get("/hr/interviews"))).await
}

/// Plan an interview between a candidate and a project manager.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn create(
    client: &ApiClient,
    candidate_id: i64,
    project_manager_id: i64,
    plan: &InterviewPlan,
) -> Result<Interview, ApiError> {
    let request = ApiRequest::post("/hr/interview/create")
        .query("candidateId", candidate_id)
        .query("projectManagerId", project_manager_id)
        .json(plan)?;
    let interview: Interview = client.send(authorized(client, request)).await?;
    info!(interview_id = interview.id, candidate_id, project_manager_id, "interview planned");
    Ok(interview)
}

/// Replace an interview's details; participants change only when given.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn update(
    client: &ApiClient,
    interview_id: i64,
    candidate_id: Option<i64>,
    project_manager_id: Option<i64>,
    plan: &InterviewPlan,
) -> Result<Interview, ApiError> {
    let mut request = ApiRequest::put(format!("/hr/interview/update/{interview_id}")).json(plan)?;
    if let Some(id) = candidate_id {
        request = request.query("candidateId", id);
    }
    if let Some(id) = project_manager_id {
        request = request.query("projectManagerId", id);
    }
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn delete(client: &ApiClient, interview_id: i64) -> Result<(), ApiError> {
    let request = ApiRequest::delete(format!("/hr/interview/{interview_id}"));
    let _: IgnoredAny = client.send(authorized(client, request)).await?;
    Ok(())
}

/// Cancel an interview. Returns the backend's confirmation text.
///
/// # Errors
///
/// See [`ApiClient::send_text`].
pub async fn cancel(client: &ApiClient, interview_id: i64) -> Result<String, ApiError> {
    let request = ApiRequest::put(format!("/hr/interview/{interview_id}/cancel"));
    let text = client.send_text(authorized(client, request)).await?;
    info!(interview_id, "interview cancelled");
    Ok(text)
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn for_candidate(client: &ApiClient, candidate_id: i64) -> Result<Vec<Interview>, ApiError> {
    let request = ApiRequest::get(format!("/candidates/{candidate_id}/interviews"));
    client.send(authorized(client, request)).await
}

/// # Errors
///
/// See [`ApiClient::send`].
pub async fn for_project_manager(client: &ApiClient, project_manager_id: i64) -> Result<Vec<Interview>, ApiError> {
    let request = ApiRequest::get(format!("/projectmanagers/{project_manager_id}/interviews"));
    client.send(authorized(client, request)).await
}

/// Record a project manager's evaluation comment.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] for a blank comment, otherwise see
/// [`ApiClient::send_text`].
pub async fn evaluate(client: &ApiClient, interview_id: i64, comment: &str) -> Result<String, ApiError> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(ApiError::InvalidRequest("Please enter a comment before evaluating.".into()));
    }
    let request = ApiRequest::put(format!("/projectmanagers/interviews/{interview_id}/evaluate")).query("comment", comment);
    let text = client.send_text(authorized(client, request)).await?;
    info!(interview_id, "interview evaluated");
    Ok(text)
}

/// Project managers HR can assign interviews to.
///
/// # Errors
///
/// See [`ApiClient::send`].
pub async fn project_managers(client: &ApiClient) -> Result<Vec<Person>, ApiError> {
    client.send(authorized(client, ApiRequest::get("/projectmanagers"))).await
}
