//! Route guard.
//!
//! DESIGN
//! ======
//! The guard is a pure function of the session state and the route's
//! access rule. It never caches: callers re-evaluate on every navigation
//! and every session change, so a logout or a 401 elsewhere takes effect
//! on the next evaluation.
//!
//! While the session is still `Unknown` the guard answers `Loading` instead
//! of redirecting, so a stored session is never bounced to `/login` before
//! it has been read back.

use crate::router::navigator::{HOME_ROUTE, LOGIN_ROUTE};
use crate::router::table::RouteAccess;
use crate::session::role::Role;
use crate::session::store::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not yet known; show a neutral placeholder.
    Loading,
    /// No usable session.
    RedirectToLogin,
    /// Logged in, but the role is not permitted here.
    RedirectHome,
    Render,
}

impl GuardDecision {
    /// Where a redirecting decision sends the user.
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(LOGIN_ROUTE),
            Self::RedirectHome => Some(HOME_ROUTE),
            Self::Loading | Self::Render => None,
        }
    }
}

/// Exact role membership. No hierarchy: ADMIN does not imply HR.
#[must_use]
pub fn is_authorized(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

#[must_use]
pub fn evaluate(state: &SessionState, access: &RouteAccess) -> GuardDecision {
    if !access.is_protected() {
        return GuardDecision::Render;
    }
    let user = match state {
        SessionState::Unknown => return GuardDecision::Loading,
        SessionState::Anonymous => return GuardDecision::RedirectToLogin,
        SessionState::Authenticated(user) => user,
    };
    if !user.has_token() {
        return GuardDecision::RedirectToLogin;
    }
    match access {
        // An empty allow-list carries no role restriction.
        RouteAccess::Roles(allowed)
            if !allowed.is_empty() && !is_authorized(user.role, allowed) =>
        {
            GuardDecision::RedirectHome
        }
        _ => GuardDecision::Render,
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;
