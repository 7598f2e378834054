//! Route table: path patterns and who may see them.

use crate::session::role::Role;

/// Who may render a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    /// Rendered for everybody, no guard.
    Public,
    /// Any logged-in user.
    Authenticated,
    /// Logged-in users whose role is listed. An empty list means any role.
    Roles(Vec<Role>),
}

impl RouteAccess {
    #[must_use]
    pub fn roles(roles: &[Role]) -> Self {
        Self::Roles(roles.to_vec())
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Public)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDef {
    /// `/literal`, `/:param` and trailing `/*` segments.
    pub pattern: String,
    /// Name of the page rendered for this route.
    pub page: String,
    pub access: RouteAccess,
}

impl RouteDef {
    fn is_wildcard(&self) -> bool {
        self.pattern.ends_with("/*")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDef,
    pub params: Vec<(String, String)>,
}

impl RouteMatch<'_> {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: &str, page: &str, access: RouteAccess) -> Self {
        self.routes.push(RouteDef { pattern: pattern.to_owned(), page: page.to_owned(), access });
        self
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// The application's routes.
    #[must_use]
    pub fn application() -> Self {
        use Role::{Admin, Candidate, Hr, Pm};

        Self::new()
            .route("/", "home", RouteAccess::Public)
            .route("/login", "login", RouteAccess::Public)
            .route("/register", "register", RouteAccess::Public)
            .route("/joboffers", "job-offers", RouteAccess::Public)
            .route("/offer", "candidate-job-offers", RouteAccess::roles(&[Candidate]))
            .route("/applications", "my-applications", RouteAccess::roles(&[Candidate]))
            .route("/candidate/interviews", "candidate-interviews", RouteAccess::roles(&[Candidate]))
            .route("/candidate/profile", "candidate-profile", RouteAccess::roles(&[Candidate]))
            .route("/hr", "hr-dashboard", RouteAccess::roles(&[Hr]))
            .route("/hr/profile", "hr-profile", RouteAccess::roles(&[Hr]))
            .route("/hr/*", "hr-dashboard", RouteAccess::roles(&[Hr]))
            .route("/pm/*", "pm-dashboard", RouteAccess::roles(&[Pm]))
            .route("/admin", "admin-dashboard", RouteAccess::roles(&[Admin]))
            .route("/admin/create-user", "admin-create-user", RouteAccess::roles(&[Admin]))
            .route("/admin/users", "admin-users", RouteAccess::roles(&[Admin]))
            .route("/admin/ml-model", "admin-ml-model", RouteAccess::roles(&[Admin]))
            .route("/account", "account", RouteAccess::Authenticated)
    }

    /// Match `path` against the table. Literal patterns beat wildcards;
    /// otherwise the first declared route wins.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        let mut wildcard: Option<RouteMatch<'_>> = None;
        for route in &self.routes {
            let Some(params) = match_pattern(&route.pattern, &path) else {
                continue;
            };
            if !route.is_wildcard() {
                return Some(RouteMatch { route, params });
            }
            if wildcard.is_none() {
                wildcard = Some(RouteMatch { route, params });
            }
        }
        wildcard
    }
}

/// Strip query/fragment and trailing slashes; `""` becomes `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let mut params = Vec::new();
    let mut path_segments = segments(path);
    for expected in segments(pattern) {
        if expected == "*" {
            return Some(params);
        }
        let actual = path_segments.next()?;
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_owned(), actual.to_owned()));
        } else if expected != actual {
            return None;
        }
    }
    path_segments.next().is_none().then_some(params)
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
