//! Client configuration.

use std::time::Duration;

/// Relative path of the credential login endpoint.
pub const LOGIN_PATH: &str = "/auth/login";
/// Relative path of the token refresh endpoint (cookie-authenticated).
pub const REFRESH_PATH: &str = "/auth/refresh";
/// Relative path of the logout endpoint.
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Inactivity window before the session is force-closed: 1 hour.
pub const DEFAULT_SESSION_SECS: u64 = 3600;

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Configuration for the Hero client stack.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend base URL (e.g. `http://localhost:5000/api`).
    pub base_url: String,
    /// Seconds of inactivity before the session force-logs-out.
    pub session_secs: u64,
    /// Transport-level timeout applied to every request. `None` reproduces
    /// the browser client, which set no deadline of its own.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable       | Default                     |
    /// |----------------|-----------------------------|
    /// | `HERO_API_URL` | `http://localhost:5000/api` |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("HERO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            ..Self::default()
        }
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// Joins with exactly one slash regardless of how the base or path are
    /// written, so `/auth/login` and `auth/login` land on the same URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            session_secs: DEFAULT_SESSION_SECS,
            request_timeout: None,
        }
    }
}
