//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:8089";
const STATE_DIR_NAME: &str = "hireflow";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute API base every endpoint path is appended to.
    pub api_base_url: String,
    /// Directory backing the persisted session.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `HIREFLOW_API_BASE_URL`: default `/api`
    /// - `HIREFLOW_ORIGIN`: origin for a relative base, default `http://localhost:8089`
    /// - `HIREFLOW_STATE_DIR`: default `<data dir>/hireflow`
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base = std::env::var("HIREFLOW_API_BASE_URL").ok();
        let origin = std::env::var("HIREFLOW_ORIGIN").ok();
        let state_dir = std::env::var("HIREFLOW_STATE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(Self::default_state_dir, PathBuf::from);
        Self::new(base.as_deref(), origin.as_deref(), state_dir)
    }

    /// Build config from explicit values, applying the same defaults as
    /// [`ClientConfig::from_env`].
    pub fn new(base: Option<&str>, origin: Option<&str>, state_dir: PathBuf) -> Self {
        Self { api_base_url: resolve_base_url(base, origin), state_dir }
    }

    /// `<data dir>/hireflow`, or under the temp dir when the platform has
    /// no data dir.
    #[must_use]
    pub fn default_state_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(STATE_DIR_NAME)
    }

    /// Absolute URL for an endpoint path such as `/hr/interviews`.
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.is_empty() || endpoint.starts_with('/') {
            format!("{}{endpoint}", self.api_base_url)
        } else {
            format!("{}/{endpoint}", self.api_base_url)
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Join a possibly relative API base onto the origin.
pub(crate) fn resolve_base_url(base: Option<&str>, origin: Option<&str>) -> String {
    let base = non_empty(base).unwrap_or(DEFAULT_API_BASE_URL);
    if base.starts_with("http://") || base.starts_with("https://") {
        return base.trim_end_matches('/').to_owned();
    }
    let origin = non_empty(origin).unwrap_or(DEFAULT_ORIGIN).trim_end_matches('/');
    let path = base.trim_matches('/');
    if path.is_empty() {
        origin.to_owned()
    } else {
        format!("{origin}/{path}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
