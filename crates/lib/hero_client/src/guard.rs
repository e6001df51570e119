// @zen-component: NAV-RouteGuard
//
//! Navigation guard.
//!
//! The host UI owns routing; this module only decides. For every intended
//! navigation the guard answers with a [`GuardDecision`], and after a
//! completed navigation the activity hook pushes the inactivity deadline
//! back.

use tracing::debug;

use crate::store::TokenStore;

/// Route names that never require a session.
pub const PUBLIC_ROUTES: [&str; 4] = ["Login", "FindPassword", "ResetPassword", "Forbidden"];

const LOGIN_ROUTE: &str = "Login";
const AUTH_PATH_PREFIX: &str = "/auth";

/// Where the host wants to navigate.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    /// Route name (e.g. `PayrollHistory`), matched against the public list.
    pub name: String,
    /// Full path including query, preserved for post-login return.
    pub full_path: String,
    /// Roles required to enter; empty means any authenticated user.
    pub required_roles: Vec<String>,
}

impl RouteTarget {
    pub fn new(name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            required_roles: Vec::new(),
        }
    }

    pub fn with_roles<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.required_roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Proceed to the requested route.
    Allow,
    /// Already signed in; going to the login view makes no sense.
    RedirectHome,
    /// No session; go sign in, then come back to `redirect`.
    RedirectLogin { redirect: String },
    /// Signed in but missing every required role.
    RedirectForbidden,
}

/// Route-level access control over a [`TokenStore`].
pub struct NavigationGuard {
    store: TokenStore,
    public_routes: Vec<String>,
}

impl NavigationGuard {
    pub fn new(store: TokenStore) -> Self {
        Self {
            store,
            public_routes: PUBLIC_ROUTES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Replace the public route list.
    pub fn with_public_routes<S: Into<String>>(
        mut self,
        routes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.public_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    // @zen-impl: NAV-1_AC-1, NAV-1_AC-2, NAV-2_AC-1
    /// Decide a navigation.
    ///
    /// An unauthenticated hit on a protected route first probes the refresh
    /// cookie once — a reloaded tab has an empty store but usually a live
    /// session. The probe's failure is swallowed: the redirect below is the
    /// handling.
    pub async fn before_each(&self, to: &RouteTarget) -> GuardDecision {
        let is_public = self.public_routes.iter().any(|name| name == &to.name);

        // @zen-impl: NAV-1_AC-4 — session restore attempt
        if !is_public
            && !self.store.is_authenticated().await
            && let Err(e) = self.store.refresh().await
        {
            debug!(route = %to.name, "session restore during navigation failed: {e}");
        }

        let authenticated = self.store.is_authenticated().await;

        if to.name == LOGIN_ROUTE && authenticated {
            return GuardDecision::RedirectHome;
        }
        if !is_public && !authenticated {
            debug!(route = %to.name, "unauthenticated; redirecting to login");
            return GuardDecision::RedirectLogin {
                redirect: to.full_path.clone(),
            };
        }
        if !to.required_roles.is_empty() && !self.store.has_any_role(&to.required_roles).await {
            debug!(route = %to.name, "missing required role; redirecting to forbidden");
            return GuardDecision::RedirectForbidden;
        }
        GuardDecision::Allow
    }

    /// Activity hook for completed navigations: moving around the app while
    /// signed in counts as activity, except inside the auth views.
    pub async fn after_each(&self, to: &RouteTarget) {
        if self.store.is_authenticated().await && !to.full_path.starts_with(AUTH_PATH_PREFIX) {
            self.store.refresh_session();
        }
    }
}
