//! Client-side navigation sink.
//!
//! The HTTP client needs to force the user back to `/login` after a 401, and
//! pages need to move between routes. Both go through [`Navigator`] so the
//! same code drives a browser history, a terminal shell, or a test double.

use std::sync::{Mutex, PoisonError};

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

pub trait Navigator: Send + Sync {
    /// Move to `path`, replacing whatever is currently shown.
    fn navigate(&self, path: &str);

    /// Path currently shown.
    fn current_path(&self) -> String;
}

/// In-process history stack.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl Default for History {
    fn default() -> Self {
        Self::starting_at(HOME_ROUTE)
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_at(path: &str) -> Self {
        Self { entries: Mutex::new(vec![path.to_owned()]) }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Go back one entry; the first entry is never popped.
    pub fn back(&self) -> String {
        let mut entries = self.entries();
        if entries.len() > 1 {
            entries.pop();
        }
        entries.last().cloned().unwrap_or_else(|| HOME_ROUTE.to_owned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) {
        let mut entries = self.entries();
        if entries.last().is_some_and(|last| last == path) {
            return;
        }
        tracing::debug!(path, "navigate");
        entries.push(path.to_owned());
    }

    fn current_path(&self) -> String {
        self.entries().last().cloned().unwrap_or_else(|| HOME_ROUTE.to_owned())
    }
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;
