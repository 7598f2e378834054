//! Cancellation scope for page-level calls.
//!
//! A page owns one [`RequestScope`] for as long as it is shown. Dropping the
//! scope (the page going away) cancels every call still running inside it,
//! so late responses are never applied to a page that no longer exists.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nested scope cancelled together with this one (but not vice versa).
    #[must_use]
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token() }
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `call` until it settles or the scope is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Cancelled`] if the scope is cancelled first,
    /// otherwise whatever `call` returns.
    pub async fn run<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        run_until_cancelled(&self.token, call).await
    }

    /// Run `call` on the runtime, bound to this scope.
    pub fn spawn<T, F>(&self, call: F) -> JoinHandle<Result<T, ApiError>>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move { run_until_cancelled(&token, call).await })
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_until_cancelled<T, F>(token: &CancellationToken, call: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(ApiError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod scope_test;
