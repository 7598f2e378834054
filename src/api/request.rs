//! A single pending backend request.
//!
//! Requests are built, sent once, and dropped; nothing here is retained or
//! retried.

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// File upload; the multipart boundary header is set by the HTTP stack.
    Multipart(Form),
}

#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured API base, e.g. `/hr/interviews`.
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub token: Option<String>,
    /// When false, a 401 is reported like any other rejection instead of
    /// ending the session (used by the login call itself).
    pub intercept_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            token: None,
            intercept_unauthorized: true,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Attach a bearer token; `None` and empty tokens send no header.
    #[must_use]
    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.token = token.filter(|t| !t.is_empty()).map(str::to_owned);
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    #[must_use]
    pub fn without_unauthorized_intercept(mut self) -> Self {
        self.intercept_unauthorized = false;
        self
    }

    #[must_use]
    pub fn is_upload(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }
}
