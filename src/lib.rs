//! # hireflow
//!
//! Client library for the job-application platform: candidates browse and
//! apply to job offers, HR staff manage offers, applications, interviews and
//! notifications, project managers evaluate interviews, and admins manage
//! users and the scoring model.
//!
//! This crate holds the client-side session store, the authenticated HTTP
//! client, the role-gated router and navigation menu, and typed wrappers for
//! the backend endpoints each page drives. The `cli/` crate wires them into a
//! command-line shell.

pub mod api;
pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod router;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use api::client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorCode, StorageError};
pub use session::role::Role;
pub use session::store::{SessionState, SessionStore};
