//! Authenticated access to the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `request` describes one pending call, `client` performs it (bearer token,
//! error normalization, 401 logout), and `scope` ties calls to the lifetime
//! of the page that issued them.

pub mod client;
pub mod request;
pub mod scope;

pub use client::ApiClient;
pub use request::{ApiRequest, RequestBody};
pub use scope::RequestScope;
