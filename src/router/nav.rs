//! Role-aware navigation menu.
//!
//! The menu is derived, never stored: it is a function of the session
//! snapshot and the current path, recomputed whenever either changes.

use crate::router::navigator::LOGIN_ROUTE;
use crate::session::role::Role;
use crate::session::store::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub target: &'static str,
}

const fn link(label: &'static str, target: &'static str) -> NavLink {
    NavLink { label, target }
}

const ANONYMOUS_LINKS: &[NavLink] = &[
    link("Home", "/"),
    link("Job Offers", "/joboffers"),
    link("Login", "/login"),
    link("Register", "/register"),
];

const CANDIDATE_LINKS: &[NavLink] = &[
    link("Home", "/"),
    link("Job Offers", "/offer"),
    link("My Applications", "/applications"),
    link("My Interviews", "/candidate/interviews"),
    link("Profile", "/candidate/profile"),
];

const HR_LINKS: &[NavLink] = &[link("HR Dashboard", "/hr"), link("Profile", "/hr/profile")];

const PM_LINKS: &[NavLink] = &[link("PM Dashboard", "/pm")];

const ADMIN_LINKS: &[NavLink] = &[
    link("Admin Dashboard", "/admin"),
    link("Users", "/admin/users"),
    link("Create User", "/admin/create-user"),
    link("ML Model", "/admin/ml-model"),
];

#[must_use]
pub fn links_for_role(role: Role) -> &'static [NavLink] {
    match role {
        Role::Candidate => CANDIDATE_LINKS,
        Role::Hr => HR_LINKS,
        Role::Pm => PM_LINKS,
        Role::Admin => ADMIN_LINKS,
    }
}

/// Links shown for `state`. Nothing while the session is still unknown.
#[must_use]
pub fn visible_links(state: &SessionState) -> &'static [NavLink] {
    match state {
        SessionState::Unknown => &[],
        SessionState::Anonymous => ANONYMOUS_LINKS,
        SessionState::Authenticated(user) => links_for_role(user.role),
    }
}

/// `target` is active when `path` is it or lies beneath it. `/` only
/// matches itself.
#[must_use]
pub fn is_active(target: &str, path: &str) -> bool {
    if target == "/" {
        return path == "/";
    }
    path == target
        || path
            .strip_prefix(target)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// What selecting a menu entry does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    Navigate,
    /// End the session, then land on `target`.
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub target: &'static str,
    pub active: bool,
    pub action: NavAction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavMenu {
    /// Role links, followed by a Logout entry for authenticated sessions.
    pub items: Vec<NavItem>,
    /// Name shown next to the logout entry.
    pub user_label: Option<String>,
}

impl NavMenu {
    #[must_use]
    pub fn derive(state: &SessionState, current_path: &str) -> Self {
        let mut items: Vec<NavItem> = visible_links(state)
            .iter()
            .map(|l| NavItem {
                label: l.label,
                target: l.target,
                active: is_active(l.target, current_path),
                action: NavAction::Navigate,
            })
            .collect();
        let user = state.user();
        if user.is_some() {
            items.push(NavItem {
                label: "Logout",
                target: LOGIN_ROUTE,
                active: false,
                action: NavAction::Logout,
            });
        }
        Self { items, user_label: user.map(|u| u.display_name()) }
    }

    #[must_use]
    pub fn active_item(&self) -> Option<&NavItem> {
        self.items.iter().find(|i| i.active)
    }

    #[must_use]
    pub fn show_logout(&self) -> bool {
        self.items.iter().any(|i| i.action == NavAction::Logout)
    }
}

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;
