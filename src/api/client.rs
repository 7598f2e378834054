//! Authenticated HTTP client.
//!
//! ARCHITECTURE
//! ============
//! Every backend call funnels through [`ApiClient::send`]: build the absolute
//! URL, attach `Authorization: Bearer` when a token is given, then map the
//! response into `Ok(json)` or an [`ApiError`].
//!
//! ERROR HANDLING
//! ==============
//! A 401 is global, not local: whichever page issued the call, the session
//! is expired and the navigator is sent to `/login` before the caller sees
//! `ApiError::Unauthorized`. Every other failure is returned to the caller
//! untouched. Calls are at-most-once: no retries, no timeouts.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::request::{ApiRequest, RequestBody};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::router::navigator::{LOGIN_ROUTE, Navigator};
use crate::session::store::SessionStore;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the HTTP stack cannot be built.
    pub fn new(config: ClientConfig, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("http client build failed: {e}")))?;
        Ok(Self { http, config, session, navigator })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError> {
        self.send(ApiRequest::get(endpoint).bearer(token)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::post(endpoint).json(body)?.bearer(token)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn put<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::put(endpoint).json(body)?.bearer(token)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError> {
        self.send(ApiRequest::delete(endpoint).bearer(token)).await
    }

    /// POST a multipart form. No `Content-Type` is forced so the boundary
    /// header survives.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn upload_file<T: DeserializeOwned>(&self, endpoint: &str, form: Form, token: Option<&str>) -> Result<T, ApiError> {
        self.send(ApiRequest::post(endpoint).multipart(form).bearer(token)).await
    }

    // =========================================================================
    // SEND
    // =========================================================================

    /// Perform one request and decode its JSON body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response arrived.
    /// - [`ApiError::Unauthorized`] on 401 (session cleared, navigated to login).
    /// - [`ApiError::Domain`] on any other non-2xx status.
    /// - [`ApiError::Decode`] when a 2xx body does not fit `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let text = self.send_text(request).await?;
        decode_body(&text)
    }

    /// [`ApiClient::send`] for endpoints that answer with plain text (or
    /// nothing). Returns the raw success body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`], minus decoding.
    pub async fn send_text(&self, request: ApiRequest) -> Result<String, ApiError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "api_call",
            method = %request.method,
            endpoint = %request.endpoint,
            %request_id,
        );
        self.execute(request).instrument(span).await
    }

    /// [`ApiClient::send`], abandoned with [`ApiError::Cancelled`] as soon as
    /// `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn send_cancellable<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let endpoint = request.endpoint.clone();
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(%endpoint, "api call cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    async fn execute(&self, request: ApiRequest) -> Result<String, ApiError> {
        let url = self.config.url_for(&request.endpoint);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        if let Some(token) = request.token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "api call failed before a response arrived");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && request.intercept_unauthorized {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "api response body unreadable");
            ApiError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), %message, "api call rejected");
            return Err(ApiError::Domain { status: status.as_u16(), message });
        }

        tracing::debug!(status = status.as_u16(), "api call succeeded");
        Ok(text)
    }

    fn handle_unauthorized(&self) {
        let had_session = self.session.expire();
        self.navigator.navigate(LOGIN_ROUTE);
        tracing::warn!(had_session, "backend rejected credentials; redirected to login");
    }
}

/// Human-readable message for a rejected call: the JSON body's `message`
/// when present, else a generic status message.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP error {status}"))
}

/// Decode a success body; an empty body decodes as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let decoded = if text.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(text)
    };
    decoded.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
