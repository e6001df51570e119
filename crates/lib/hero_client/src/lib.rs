//! # hero_client
//!
//! Client-side session and authentication core for Hero:
//!
//! 1. [`TokenStore`] — in-memory access token plus decoded identity claims,
//!    inactivity timer, and session events.
//! 2. [`ApiClient`] — JSON HTTP client that attaches the bearer token,
//!    unwraps response envelopes, and transparently replays a request once
//!    after re-authenticating on 401.
//! 3. [`NavigationGuard`] — route-level access decisions for the host UI.
//!
//! The refresh token itself never surfaces here; it lives in an HttpOnly
//! cookie managed by the transport's cookie jar.

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod store;
pub mod types;

mod refresh;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardDecision, NavigationGuard, RouteTarget};
pub use session::{SessionEvent, SessionTimer};
pub use store::TokenStore;
pub use types::{ApiEnvelope, LoginResponse};

/// Returns the version of the hero_client crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
