// @zen-component: AUTH-TokenStore
//
//! In-memory access token store.
//!
//! Holds the access token and its decoded claims for the lifetime of the
//! process — nothing is persisted, so a restart drops straight back to the
//! refresh cookie. The store also owns the shared HTTP transport (one cookie
//! jar for the whole stack), the inactivity timer and the session event
//! channel.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use hero_core::auth::token::decode_claims;
use hero_core::models::auth::IdentityClaims;

use crate::config::{ClientConfig, LOGOUT_PATH, REFRESH_PATH};
use crate::error::{ClientError, ClientResult, error_from_response};
use crate::session::{SessionEvent, SessionTimer};
use crate::types::ApiEnvelope;

/// Shared handle to the authentication state. Clones are cheap and all see
/// the same session.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    config: ClientConfig,
    http: reqwest::Client,
    state: RwLock<AuthState>,
    timer: SessionTimer,
    events: broadcast::Sender<SessionEvent>,
}

/// Token and claims move together: both set on login, both cleared on
/// logout, always under one write guard.
#[derive(Default)]
struct AuthState {
    access_token: Option<String>,
    claims: Option<IdentityClaims>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshData {
    access_token: String,
}

impl TokenStore {
    /// Build a store and the shared HTTP transport.
    ///
    /// The transport keeps a cookie jar so the HttpOnly refresh cookie set
    /// on login travels with every later request, exactly as it would in a
    /// browser. [`crate::ApiClient`] clones this transport rather than
    /// building its own.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("hero-client/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            inner: Arc::new(StoreInner {
                timer: SessionTimer::new(config.session_secs),
                config,
                http,
                state: RwLock::new(AuthState::default()),
                events,
            }),
        })
    }

    // @zen-impl: AUTH-1_AC-1
    /// Install an access token: decode its claims, store both atomically
    /// and (re)start the inactivity countdown.
    ///
    /// An undecodable token fails silently into a full [`Self::logout`] —
    /// the session is unusable either way, and callers on the response path
    /// have no better recovery than starting over.
    pub async fn login(&self, token: &str) {
        match decode_claims(token) {
            Ok(claims) => {
                debug!(employee = %claims.employee_number, "access token installed");
                {
                    let mut state = self.inner.state.write().await;
                    state.access_token = Some(token.to_string());
                    state.claims = Some(claims);
                }
                self.start_session();
            }
            Err(e) => {
                warn!("rejecting undecodable access token: {e}");
                self.logout().await;
            }
        }
    }

    // @zen-impl: AUTH-4_AC-1, AUTH-4_AC-2
    /// End the session: tell the server (best effort), then always clear
    /// local state, stop the timer and emit [`SessionEvent::LoggedOut`].
    ///
    /// Server-side failures are logged and swallowed — local state clears
    /// no matter what, so the client never stays half-logged-in.
    pub async fn logout(&self) {
        let bearer = self.access_token().await;
        let url = self.inner.config.endpoint_url(LOGOUT_PATH);
        let mut request = self.inner.http.post(&url);
        if let Some(token) = &bearer {
            request = request.bearer_auth(token);
        }
        match request.send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "server rejected logout");
            }
            Ok(_) => debug!("server session closed"),
            Err(e) => warn!("logout request failed: {e}"),
        }

        {
            let mut state = self.inner.state.write().await;
            state.access_token = None;
            state.claims = None;
        }
        self.inner.timer.stop();
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
    }

    // @zen-impl: AUTH-3_AC-1, AUTH-3_AC-2
    /// Obtain a fresh access token using the refresh cookie.
    ///
    /// No bearer is attached — the HttpOnly cookie is the credential and the
    /// server rotates it on every call. Failures are returned to the caller
    /// untouched; escalating a failed refresh to a logout is the refresh
    /// coordinator's decision, not this method's.
    pub async fn refresh(&self) -> ClientResult<()> {
        let url = self.inner.config.endpoint_url(REFRESH_PATH);
        let response = self.inner.http.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let envelope: ApiEnvelope<RefreshData> = response
            .json()
            .await
            .map_err(|e| ClientError::BadResponse(format!("invalid refresh response: {e}")))?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "refresh rejected".into());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let token = envelope
            .data
            .map(|data| data.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ClientError::BadResponse("refresh response carried no access token".into())
            })?;

        // @zen-impl: AUTH-3_AC-3 — an undecodable rotation ends the session
        self.login(&token).await;
        if self.is_authenticated().await {
            debug!("access token refreshed");
            Ok(())
        } else {
            Err(ClientError::SessionExpired(
                "refreshed access token could not be decoded".into(),
            ))
        }
    }

    /// The current access token, if a session is open.
    pub async fn access_token(&self) -> Option<String> {
        self.inner.state.read().await.access_token.clone()
    }

    /// The decoded identity claims, if a session is open.
    pub async fn claims(&self) -> Option<IdentityClaims> {
        self.inner.state.read().await.claims.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.access_token.is_some()
    }

    pub async fn employee_id(&self) -> Option<i64> {
        self.inner
            .state
            .read()
            .await
            .claims
            .as_ref()
            .map(|claims| claims.employee_id)
    }

    /// Whether the signed-in user holds the given role. `false` when no
    /// session is open.
    pub async fn has_role(&self, role: &str) -> bool {
        self.inner
            .state
            .read()
            .await
            .claims
            .as_ref()
            .is_some_and(|claims| claims.has_role(role))
    }

    /// Whether the signed-in user holds any of the given roles.
    pub async fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.inner
            .state
            .read()
            .await
            .claims
            .as_ref()
            .is_some_and(|claims| claims.has_any_role(roles))
    }

    /// Treat the current moment as user activity: push the inactivity
    /// deadline back to the full window.
    pub fn refresh_session(&self) {
        self.inner.timer.reset();
    }

    /// Seconds of inactivity left before forced logout.
    pub fn session_remaining(&self) -> i64 {
        self.inner.timer.remaining_seconds()
    }

    /// Subscribe to session lifecycle events. Only events emitted after the
    /// call are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn transport(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn start_session(&self) {
        let weak = Arc::downgrade(&self.inner);
        self.inner.timer.start(move || {
            if let Some(inner) = weak.upgrade() {
                tokio::spawn(async move {
                    TokenStore { inner }.expire().await;
                });
            }
        });
    }

    // @zen-impl: SES-2_AC-1
    async fn expire(&self) {
        info!("session expired after inactivity; forcing logout");
        self.logout().await;
        let _ = self.inner.events.send(SessionEvent::Expired);
    }
}
