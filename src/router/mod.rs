//! Client-side routing: route table, guard, navigation menu.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Router`] ties the route table to the live session and the navigator.
//! Resolution reads a fresh session snapshot on every call, so a login,
//! logout or forced expiry is reflected on the very next navigation
//! without any invalidation step.

pub mod guard;
pub mod nav;
pub mod navigator;
pub mod table;

use std::sync::Arc;

use tracing::debug;

pub use guard::{GuardDecision, evaluate, is_authorized};
pub use nav::{NavAction, NavItem, NavMenu};
pub use navigator::{HOME_ROUTE, History, LOGIN_ROUTE, Navigator};
pub use table::{RouteAccess, RouteDef, RouteTable};

use crate::session::store::SessionStore;

/// Redirect chains longer than this are treated as a misconfigured table.
const MAX_REDIRECTS: usize = 4;

/// Outcome of resolving a path against the table and the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Loading,
    Redirect(String),
    Render { page: String, params: Vec<(String, String)> },
    NotFound,
}

pub struct Router {
    table: RouteTable,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { table, session, navigator }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve `path` without moving.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Resolution {
        let Some(found) = self.table.find(path) else {
            return Resolution::NotFound;
        };
        let decision = guard::evaluate(&self.session.snapshot(), &found.route.access);
        match decision {
            GuardDecision::Loading => Resolution::Loading,
            GuardDecision::Render => Resolution::Render {
                page: found.route.page.clone(),
                params: found.params,
            },
            GuardDecision::RedirectToLogin | GuardDecision::RedirectHome => {
                let target = decision.redirect_target().unwrap_or(HOME_ROUTE);
                Resolution::Redirect(target.to_owned())
            }
        }
    }

    /// Resolve `path`, follow redirects and move the navigator to the
    /// final path. `Loading` leaves the navigator where it is.
    pub fn navigate(&self, path: &str) -> Resolution {
        let mut path = table::normalize_path(path);
        for _ in 0..MAX_REDIRECTS {
            match self.resolve(&path) {
                Resolution::Redirect(target) => {
                    debug!(from = %path, to = %target, "router: redirect");
                    path = target;
                }
                Resolution::Loading => return Resolution::Loading,
                resolved => {
                    self.navigator.navigate(&path);
                    return resolved;
                }
            }
        }
        debug!(%path, "router: redirect limit reached");
        Resolution::NotFound
    }

    /// Re-resolve whatever the navigator currently shows.
    pub fn refresh(&self) -> Resolution {
        let current = self.navigator.current_path();
        self.navigate(&current)
    }

    /// Menu for the current session and path.
    #[must_use]
    pub fn menu(&self) -> NavMenu {
        NavMenu::derive(&self.session.snapshot(), &self.navigator.current_path())
    }
}
